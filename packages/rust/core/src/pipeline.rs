//! End-to-end conversion pipeline: vCard file → split → extract → rows → CSV.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use vcf2csv_shared::{AppConfig, InvalidRecordPolicy, NameDecoding, Result, Vcf2CsvError};
use vcf2csv_table::{ContactRow, ContactTable, WriteOptions};
use vcf2csv_vcard::{RecordBlocks, parse_contact};

/// Runtime conversion configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// vCard file to read.
    pub input: PathBuf,
    /// CSV file to write (defaults to the input path with `output_extension`).
    pub output: Option<PathBuf>,
    /// How the `FN` value is decoded.
    pub name_decoding: NameDecoding,
    /// Abort or skip on records without a usable name.
    pub on_invalid_record: InvalidRecordPolicy,
    /// Prefix the CSV with a UTF-8 byte-order mark.
    pub utf8_bom: bool,
    /// Extension for the derived output path.
    pub output_extension: String,
}

impl ConvertConfig {
    /// Start from config-file defaults for the given input.
    pub fn new(input: impl Into<PathBuf>, config: &AppConfig) -> Self {
        Self {
            input: input.into(),
            output: None,
            name_decoding: config.defaults.name_decoding,
            on_invalid_record: config.defaults.on_invalid_record,
            utf8_bom: config.defaults.utf8_bom,
            output_extension: config.defaults.output_extension.clone(),
        }
    }

    /// The CSV path that will be written.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.input.with_extension(&self.output_extension),
        }
    }
}

/// Counters collected while converting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Record blocks read from the input.
    pub records: usize,
    /// Rows produced.
    pub rows: usize,
    /// Records left out under the skip policy.
    pub skipped: usize,
    /// Phone numbers that did not fit in the phone columns.
    pub phones_dropped: usize,
}

/// Result of a completed conversion.
#[derive(Debug)]
pub struct ConvertResult {
    /// Path of the written CSV.
    pub output_path: PathBuf,
    /// Conversion counters.
    pub stats: ConvertStats,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each record becomes a row.
    fn record_converted(&self, name: &str, current: usize);
    /// Called when a record is skipped.
    fn record_skipped(&self, error: &Vcf2CsvError);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_converted(&self, _name: &str, _current: usize) {}
    fn record_skipped(&self, _error: &Vcf2CsvError) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Run the full conversion.
///
/// 1. Read and split the vCard file
/// 2. Extract name and phones from each record
/// 3. Build one row per record, in input order
/// 4. Write the CSV in one pass
///
/// Nothing is written unless every step before the write succeeds.
#[instrument(skip_all, fields(input = %config.input.display()))]
pub fn convert_file(
    config: &ConvertConfig,
    progress: &dyn ProgressReporter,
) -> Result<ConvertResult> {
    let start = Instant::now();
    let output_path = config.output_path();

    if output_path == config.input {
        return Err(Vcf2CsvError::config(format!(
            "output path {} would overwrite the input",
            output_path.display()
        )));
    }

    info!(
        output = %output_path.display(),
        decoding = %config.name_decoding,
        on_invalid = %config.on_invalid_record,
        "starting conversion"
    );

    // --- Phase 1: Read ---
    progress.phase("Reading contacts");
    let (table, stats) = {
        let file = File::open(&config.input).map_err(|e| Vcf2CsvError::io(&config.input, e))?;
        convert_reader(BufReader::new(file), &config.input, config, progress)?
    };

    // --- Phase 2: Write ---
    progress.phase("Writing CSV");
    let write_opts = WriteOptions {
        utf8_bom: config.utf8_bom,
    };
    table.write_file(&output_path, &write_opts)?;

    let result = ConvertResult {
        output_path,
        stats,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        records = result.stats.records,
        rows = result.stats.rows,
        skipped = result.stats.skipped,
        elapsed_ms = result.elapsed.as_millis(),
        "conversion complete"
    );

    Ok(result)
}

/// Convert every record of a vCard stream into rows.
///
/// `source` names the stream in I/O errors.
pub fn convert_reader<R: BufRead>(
    reader: R,
    source: &Path,
    config: &ConvertConfig,
    progress: &dyn ProgressReporter,
) -> Result<(ContactTable, ConvertStats)> {
    let mut table = ContactTable::new();
    let mut stats = ConvertStats::default();

    let mut blocks = RecordBlocks::new(reader).with_source(source);
    for block in blocks.by_ref() {
        let block = block?;
        stats.records += 1;

        let contact = match parse_contact(&block, config.name_decoding) {
            Ok(contact) => contact,
            Err(e) if e.is_record_level() && config.on_invalid_record == InvalidRecordPolicy::Skip => {
                warn!(line = block.start_line, error = %e, "skipping record");
                progress.record_skipped(&e);
                stats.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let (row, dropped) = ContactRow::from_contact(contact.name.as_str(), &contact.phones);
        if dropped > 0 {
            warn!(
                line = block.start_line,
                dropped,
                "record has more phone numbers than phone columns, extra numbers dropped"
            );
            stats.phones_dropped += dropped;
        }

        table.push(row);
        stats.rows += 1;
        progress.record_converted(&contact.name, stats.rows);
    }

    debug!(
        lines = blocks.lines_read(),
        records = stats.records,
        rows = stats.rows,
        "input fully read"
    );
    Ok((table, stats))
}
