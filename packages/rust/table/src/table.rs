//! Row collection and CSV writer.
//!
//! Rows are accumulated in input order and written once: one header line with
//! every column name, then one line per row. File output goes to a temporary
//! sibling first and is renamed into place, so a failed run never leaves a
//! partial CSV behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Index;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use vcf2csv_shared::{Result, Vcf2CsvError};

use crate::row::ContactRow;
use crate::schema::Column;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for CSV output.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Prefix the output with a UTF-8 byte-order mark.
    pub utf8_bom: bool,
}

/// Append-only, ordered collection of contact rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactTable {
    rows: Vec<ContactRow>,
}

impl ContactTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ContactRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContactRow> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContactRow> {
        self.rows.iter()
    }

    /// Write header and rows as CSV to any writer.
    pub fn write_to<W: Write>(&self, out: W, opts: &WriteOptions) -> Result<()> {
        self.write_csv(out, opts, Path::new("<stream>"))
    }

    /// Write the CSV file at `path`, replacing it only on success.
    #[instrument(skip_all, fields(path = %path.display(), rows = self.rows.len()))]
    pub fn write_file(&self, path: &Path, opts: &WriteOptions) -> Result<()> {
        let temp = temp_path(path)?;

        let result = self
            .write_temp(&temp, path, opts)
            .and_then(|()| std::fs::rename(&temp, path).map_err(|e| Vcf2CsvError::io(path, e)));

        if result.is_err() {
            // The temp file may not exist if creation itself failed.
            let _ = std::fs::remove_file(&temp);
            return result;
        }

        info!(rows = self.rows.len(), "CSV written");
        Ok(())
    }

    fn write_temp(&self, temp: &Path, target: &Path, opts: &WriteOptions) -> Result<()> {
        let file = File::create(temp).map_err(|e| Vcf2CsvError::io(temp, e))?;
        debug!(temp = %temp.display(), "writing to temporary file");
        self.write_csv(BufWriter::new(file), opts, target)
    }

    fn write_csv<W: Write>(&self, mut out: W, opts: &WriteOptions, path: &Path) -> Result<()> {
        if opts.utf8_bom {
            out.write_all(UTF8_BOM)
                .map_err(|e| Vcf2CsvError::io(path, e))?;
        }

        let csv_err = |e: csv::Error| Vcf2CsvError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(out);

        writer.write_record(Column::header()).map_err(csv_err)?;
        for row in &self.rows {
            writer.write_record(row.values()).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| Vcf2CsvError::io(path, e))?;

        Ok(())
    }
}

impl Index<usize> for ContactTable {
    type Output = ContactRow;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl Extend<ContactRow> for ContactTable {
    fn extend<I: IntoIterator<Item = ContactRow>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl FromIterator<ContactRow> for ContactTable {
    fn from_iter<I: IntoIterator<Item = ContactRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ContactTable {
    type Item = &'a ContactRow;
    type IntoIter = std::slice::Iter<'a, ContactRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// `.<name>.tmp` next to the target.
fn temp_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        Vcf2CsvError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;
    Ok(path.with_file_name(format!(".{}.tmp", name.to_string_lossy())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
