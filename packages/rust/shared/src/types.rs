//! Conversion mode types shared by the config file, the pipeline and the CLI.

use serde::{Deserialize, Serialize};

/// How the formatted name (`FN`) value is turned into the First Name cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameDecoding {
    /// Use the field text verbatim.
    #[default]
    Raw,
    /// Always quoted-printable decode the value (after collapsing `==`).
    QuotedPrintable,
    /// Decode only when the `FN` parameters declare `ENCODING=QUOTED-PRINTABLE`.
    Auto,
}

/// What to do with a record whose name cannot be extracted or decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidRecordPolicy {
    /// Fail the whole run; no output is written.
    #[default]
    Abort,
    /// Log the record and leave it out of the output.
    Skip,
}

impl std::fmt::Display for NameDecoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Raw => "raw",
            Self::QuotedPrintable => "quoted-printable",
            Self::Auto => "auto",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for InvalidRecordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        decoding: NameDecoding,
        policy: InvalidRecordPolicy,
    }

    #[test]
    fn modes_deserialize_from_kebab_case() {
        let parsed: Holder =
            toml::from_str("decoding = \"quoted-printable\"\npolicy = \"skip\"").expect("parse");
        assert_eq!(parsed.decoding, NameDecoding::QuotedPrintable);
        assert_eq!(parsed.policy, InvalidRecordPolicy::Skip);
    }

    #[test]
    fn display_matches_config_spelling() {
        assert_eq!(NameDecoding::QuotedPrintable.to_string(), "quoted-printable");
        assert_eq!(NameDecoding::default().to_string(), "raw");
        assert_eq!(InvalidRecordPolicy::default().to_string(), "abort");
    }
}
