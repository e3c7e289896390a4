//! Error types for vcf2csv.
//!
//! Library crates use [`Vcf2CsvError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all vcf2csv operations.
#[derive(Debug, thiserror::Error)]
pub enum Vcf2CsvError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A record block has no `FN` property.
    #[error("record starting at line {line} has no FN field")]
    MissingName { line: usize },

    /// The formatted name could not be decoded.
    #[error("cannot decode name in record starting at line {line}: {message}")]
    Decode { line: usize, message: String },

    /// Input is not a sequence of `BEGIN:VCARD` … `END:VCARD` blocks.
    #[error("malformed vCard input at line {line}: {message}")]
    Structure { line: usize, message: String },

    /// A column name outside the fixed Outlook schema.
    #[error("key {name:?} not recognized as an Outlook CSV column")]
    UnknownColumn { name: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV serialization error.
    #[error("CSV error writing {path:?}: {message}")]
    Csv { path: PathBuf, message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, Vcf2CsvError>;

impl Vcf2CsvError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a structure error for the given 1-based input line.
    pub fn structure(line: usize, msg: impl Into<String>) -> Self {
        Self::Structure {
            line,
            message: msg.into(),
        }
    }

    /// Create a decode error for the record starting at `line`.
    pub fn decode(line: usize, msg: impl Into<String>) -> Self {
        Self::Decode {
            line,
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error concerns a single record only, so the run may
    /// continue past it when invalid records are skipped.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Self::MissingName { .. } | Self::Decode { .. })
    }
}
