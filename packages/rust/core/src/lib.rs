//! Conversion pipeline for vcf2csv.
//!
//! This crate ties together record splitting, field extraction, row building
//! and CSV writing into one end-to-end run ([`pipeline::convert_file`]).

pub mod pipeline;

pub use pipeline::{
    ConvertConfig, ConvertResult, ConvertStats, ProgressReporter, SilentProgress, convert_file,
    convert_reader,
};
