//! Shared error model, conversion modes, and configuration for vcf2csv.
//!
//! This crate is the foundation depended on by all other vcf2csv crates.
//! It provides:
//! - [`Vcf2CsvError`] — the unified error type
//! - Mode types ([`NameDecoding`], [`InvalidRecordPolicy`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from, validate_config,
};
pub use error::{Result, Vcf2CsvError};
pub use types::{InvalidRecordPolicy, NameDecoding};
