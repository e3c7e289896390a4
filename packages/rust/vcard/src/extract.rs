//! Field extraction from a single record block.
//!
//! Property lines have the shape `[group.]NAME[;params]:value`. Only `FN`
//! and `TEL` are read. An `FN` value may be folded over several physical
//! lines and runs until the next line that starts a property.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use vcf2csv_shared::{NameDecoding, Result, Vcf2CsvError};

use crate::splitter::RecordBlock;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The raw `FN` property of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameField {
    /// Parameter text between `FN;` and `:`, empty when there is none.
    pub params: String,
    /// Value with folding line breaks removed, still encoded.
    pub value: String,
}

impl NameField {
    /// Whether the parameters declare quoted-printable encoding.
    ///
    /// vCard 2.1 allows both `ENCODING=QUOTED-PRINTABLE` and the bare
    /// `QUOTED-PRINTABLE` form.
    pub fn is_quoted_printable(&self) -> bool {
        self.params.split(';').any(|param| {
            let value = param
                .split_once('=')
                .map_or(param, |(key, value)| {
                    if key.trim().eq_ignore_ascii_case("ENCODING") {
                        value
                    } else {
                        ""
                    }
                });
            value.trim().eq_ignore_ascii_case("QUOTED-PRINTABLE")
        })
    }
}

/// Name and phones of one record, ready for row building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcardContact {
    /// Decoded formatted name.
    pub name: String,
    /// Phone numbers in record order.
    pub phones: Vec<String>,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// `FN[;params]:value` up to the next property line. `s` lets the lazy value
/// span folded lines.
static FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^(?:[\w-]+\.)?(?i:FN)(?:;([^:\n]*))?:(.*?)\n(?:[\w-]+\.)?[\w-]+(?:;[^:\n]*)?:")
        .expect("FN regex")
});

/// `TEL[;params]:value`, one per line. Empty values are not matched.
static TEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:[\w-]+\.)?(?i:TEL)(?:;[^:\n]*)?:([^\r\n]+)").expect("TEL regex")
});

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Locate the first `FN` property of a record.
pub fn extract_name_field(block: &RecordBlock) -> Result<NameField> {
    let caps = FN_RE
        .captures(block.as_str())
        .ok_or(Vcf2CsvError::MissingName {
            line: block.start_line,
        })?;

    Ok(NameField {
        params: caps.get(1).map_or_else(String::new, |m| m.as_str().to_string()),
        value: caps[2].replace(['\r', '\n'], ""),
    })
}

/// The formatted name of a record, undecoded. The first `FN` wins.
pub fn extract_formatted_name(block: &RecordBlock) -> Result<String> {
    extract_name_field(block).map(|field| field.value)
}

/// Every `TEL` value of a record, in the order they appear.
pub fn extract_phones(block: &RecordBlock) -> Vec<String> {
    TEL_RE
        .captures_iter(block.as_str())
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Turn an `FN` field into display text according to `mode`.
///
/// `line` identifies the record in decode errors.
pub fn decode_name(field: &NameField, mode: NameDecoding, line: usize) -> Result<String> {
    let decode = match mode {
        NameDecoding::Raw => false,
        NameDecoding::QuotedPrintable => true,
        NameDecoding::Auto => field.is_quoted_printable(),
    };

    if !decode {
        return Ok(field.value.clone());
    }

    decode_quoted_printable(&field.value).map_err(|message| Vcf2CsvError::decode(line, message))
}

/// Quoted-printable decode a name exported with doubled `=` signs.
///
/// Joining soft-broken lines leaves `==` where a trailing `=` meets the next
/// escape, so every `==` collapses to `=` before decoding.
pub fn decode_quoted_printable(raw: &str) -> std::result::Result<String, String> {
    let collapsed = raw.replace("==", "=");
    let bytes = quoted_printable::decode(collapsed.as_bytes(), quoted_printable::ParseMode::Robust)
        .map_err(|e| format!("invalid quoted-printable text: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("decoded name is not valid UTF-8: {e}"))
}

/// Extract and decode the fields of one record.
pub fn parse_contact(block: &RecordBlock, mode: NameDecoding) -> Result<VcardContact> {
    let field = extract_name_field(block)?;
    let name = decode_name(&field, mode, block.start_line)?;
    let phones = extract_phones(block);

    debug!(
        line = block.start_line,
        name = %name,
        phones = phones.len(),
        "parsed vCard record"
    );

    Ok(VcardContact { name, phones })
}
