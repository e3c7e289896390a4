//! One contact as an Outlook CSV row.

use vcf2csv_shared::Result;

use crate::schema::{COLUMN_COUNT, Column, PHONE_COLUMNS};

/// A row of the Outlook CSV file: one optional value per [`Column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    cells: [Option<String>; COLUMN_COUNT],
}

impl Default for ContactRow {
    fn default() -> Self {
        Self {
            cells: std::array::from_fn(|_| None),
        }
    }
}

impl ContactRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the row for a contact with the given name and phones.
    ///
    /// Returns the row and how many phones did not fit.
    pub fn from_contact(name: impl Into<String>, phones: &[String]) -> (Self, usize) {
        let mut row = Self::new();
        row.set_name(name);
        let dropped = row.set_phones(phones);
        (row, dropped)
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.cells[column.index()] = Some(value.into());
    }

    /// Set a cell by its header name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let column: Column = name.parse()?;
        self.set(column, value);
        Ok(())
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.cells[column.index()].as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.get(Column::FirstName)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set(Column::FirstName, name);
    }

    /// Assign numbers to [`PHONE_COLUMNS`] in order.
    ///
    /// Numbers past the last phone column are dropped; the count of dropped
    /// numbers is returned.
    pub fn set_phones(&mut self, phones: &[String]) -> usize {
        for (column, phone) in PHONE_COLUMNS.iter().zip(phones) {
            self.set(*column, phone.as_str());
        }
        phones.len().saturating_sub(PHONE_COLUMNS.len())
    }

    /// Populated phone cells, in assignment order.
    pub fn phones(&self) -> Vec<&str> {
        PHONE_COLUMNS.iter().filter_map(|c| self.get(*c)).collect()
    }

    /// Cell values in header order, `""` for unset cells.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|cell| cell.as_deref().unwrap_or(""))
    }
}
