//! Decoded tabular records.

use serde::{Deserialize, Serialize};

/// A single decoded row.
///
/// Two records are the same record when every field is equal; there is no
/// assumed primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    /// Creates a record from its field values.
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Returns the field values in column order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the value at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A header row plus the records decoded under it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordTable {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordTable {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub const fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Creates a table from columns and records.
    #[must_use]
    pub const fn with_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Appends a record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Returns the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the records.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Splits the table into its columns and records.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Record>) {
        (self.columns, self.records)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_equality_is_full_field() {
        let a: Record = ["W1", "2023-01-01", "3.2"].into_iter().collect();
        let b: Record = ["W1", "2023-01-01", "3.2"].into_iter().collect();
        let c: Record = ["W1", "2023-01-01", "3.3"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_table_push() {
        let mut table = RecordTable::new(vec!["station".into(), "level".into()]);
        table.push(["W1", "3.2"].into_iter().collect());

        assert_eq!(table.columns(), ["station", "level"]);
        assert_eq!(table.records()[0].get(1), Some("3.2"));
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
