use std::collections::{BTreeMap, HashSet};

use crate::repository::{FieldName, Record};

/// Label of the option matching members who agreed to receive email.
pub const CONSENTED: &str = "동의";
/// Label of the option matching members who did not agree to receive email.
pub const NOT_CONSENTED: &str = "미동의";

/// One entry of a column's filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub text: String,
    pub value: String,
}

impl FilterOption {
    fn plain(value: String) -> Self {
        Self {
            text: value.clone(),
            value,
        }
    }
}

/// The filter options offered for `field`, given the records currently in the table.
///
/// Options are the distinct cell values in first-seen order. The consent column always offers
/// the same two options regardless of the data.
pub fn filter_options(field: FieldName, records: &[Record]) -> Vec<FilterOption> {
    if field == FieldName::EmailConsent {
        return email_consent_options();
    }

    let mut seen = HashSet::new();

    records
        .iter()
        .map(|r| r.cell(field).into_owned())
        .filter(|value| seen.insert(value.clone()))
        .map(FilterOption::plain)
        .collect()
}

pub fn email_consent_options() -> Vec<FilterOption> {
    vec![
        FilterOption {
            text: CONSENTED.into(),
            value: true.to_string(),
        },
        FilterOption {
            text: NOT_CONSENTED.into(),
            value: false.to_string(),
        },
    ]
}

/// Whether `record` passes the filter option `value` selected on `field`.
///
/// Free text columns match on substring, the join date and consent columns on the exact cell
/// value.
pub fn matches(field: FieldName, value: &str, record: &Record) -> bool {
    let cell = record.cell(field);

    match field {
        FieldName::Name | FieldName::Address | FieldName::Memo | FieldName::Job => {
            cell.contains(value)
        }
        FieldName::JoinDate | FieldName::EmailConsent => cell == value,
    }
}

/// Filter values selected per column.
///
/// A record is shown if, for every column with a selection, it matches at least one of the
/// selected values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    selected: BTreeMap<FieldName, Vec<String>>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the selection of `field`.
    pub fn select(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        let values = self.selected.entry(field).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Replace the selection of `field`. An empty list clears it.
    pub fn set(&mut self, field: FieldName, values: Vec<String>) {
        if values.is_empty() {
            self.selected.remove(&field);
        } else {
            self.selected.insert(field, values);
        }
    }

    pub fn clear(&mut self, field: FieldName) {
        self.selected.remove(&field);
    }

    pub fn selected(&self, field: FieldName) -> &[String] {
        self.selected.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_match(&self, record: &Record) -> bool {
        self.selected.iter().all(|(field, values)| {
            values.is_empty() || values.iter().any(|v| matches(*field, v, record))
        })
    }

    /// The records that pass every column's selection, in their original order.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.is_match(r)).collect()
    }
}
