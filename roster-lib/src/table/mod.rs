//! What the table view needs from the core: column descriptors with their filter options,
//! and the set of selected rows.

use strum::IntoEnumIterator;

use crate::repository::{FieldName, Record, RecordId};

pub mod filters;

pub use filters::{FilterOption, Filters, filter_options, matches};

/// One column of the member table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: FieldName,
    pub title: &'static str,
    pub options: Vec<FilterOption>,
}

/// Columns for the current `records`, in display order.
pub fn columns(records: &[Record]) -> Vec<Column> {
    FieldName::iter()
        .map(|field| Column {
            field,
            title: field.label(),
            options: filter_options(field, records),
        })
        .collect()
}

/// Key identifying a row of the table.
pub fn row_key(record: &Record) -> &RecordId {
    record.id()
}

/// Rows currently selected in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `keys`, dropping duplicates.
    pub fn set(&mut self, keys: impl IntoIterator<Item = RecordId>) {
        self.keys.clear();
        for key in keys {
            if !self.keys.contains(&key) {
                self.keys.push(key);
            }
        }
    }

    pub fn keys(&self) -> &[RecordId] {
        &self.keys
    }

    pub fn contains(&self, key: &RecordId) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Forget keys of rows that are no longer in `records`.
    pub fn retain_existing(&mut self, records: &[Record]) {
        self.keys
            .retain(|key| records.iter().any(|r| row_key(r) == key));
    }
}
