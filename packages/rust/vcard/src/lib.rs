//! vCard 2.1 reading: record splitting and name/phone extraction.
//!
//! This crate provides:
//! - [`RecordBlocks`] — lazy iterator of raw record blocks over any `BufRead`
//! - [`extract_formatted_name`] / [`extract_phones`] — field extraction
//! - [`decode_name`] — optional quoted-printable decoding of the name

pub mod extract;
pub mod splitter;

pub use extract::{
    NameField, VcardContact, decode_name, decode_quoted_printable, extract_formatted_name,
    extract_name_field, extract_phones, parse_contact,
};
pub use splitter::{BEGIN_MARKER, END_MARKER, RecordBlock, RecordBlocks};
