//! Outlook CSV row model and writer.
//!
//! This crate provides:
//! - [`Column`] — the fixed, ordered Outlook 2003 column schema
//! - [`ContactRow`] — one contact mapped onto that schema
//! - [`ContactTable`] — the ordered row collection and its CSV writer

pub mod row;
pub mod schema;
pub mod table;

pub use row::ContactRow;
pub use schema::{COLUMN_COUNT, Column, PHONE_COLUMNS};
pub use table::{ContactTable, WriteOptions};
