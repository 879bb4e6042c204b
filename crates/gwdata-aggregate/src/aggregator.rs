//! Outcome-to-table aggregation.

use gwdata_types::{DateWindow, FetchOutcome, Record, RecordTable, WindowFailure};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Merged records of a run plus what happened to every window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AggregateResult {
    /// Deduplicated records in window order.
    pub table: RecordTable,
    /// Records received before deduplication.
    pub total_fetched: usize,
    /// Records dropped as exact duplicates.
    pub duplicates_removed: usize,
    /// Windows that fetched successfully.
    pub windows_succeeded: usize,
    /// Failed windows in ascending window order.
    pub failures: Vec<WindowFailure>,
}

impl AggregateResult {
    /// Returns the windows that failed, ascending.
    pub fn failed_windows(&self) -> impl Iterator<Item = DateWindow> + '_ {
        self.failures.iter().map(|f| f.window)
    }

    /// Returns the number of records kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if no records were kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns true if windows were attempted and none succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.windows_succeeded == 0 && !self.failures.is_empty()
    }
}

/// Column identity: name plus occurrence, so repeated headers stay distinct.
type ColumnKey = (String, usize);

fn column_keys(columns: &[String]) -> Vec<ColumnKey> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    columns
        .iter()
        .map(|name| {
            let n = seen.entry(name.as_str()).or_insert(0);
            let key = (name.clone(), *n);
            *n += 1;
            key
        })
        .collect()
}

/// Folds fetch outcomes into an [`AggregateResult`].
///
/// Tables are aligned on the union of their columns in first-seen order; a
/// value for a column a window did not return is empty. Deduplication runs on
/// the aligned rows and keeps the first occurrence.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    tables: Vec<RecordTable>,
    failures: Vec<WindowFailure>,
}

impl ResultAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one outcome. Successes must be pushed in window order.
    pub fn push(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Success { records, .. } => self.tables.push(records),
            FetchOutcome::Failure(failure) => self.failures.push(failure),
        }
    }

    /// Merges everything pushed so far.
    #[must_use]
    pub fn finish(self) -> AggregateResult {
        let Self {
            tables,
            mut failures,
        } = self;
        let windows_succeeded = tables.len();

        let mut union: Vec<ColumnKey> = Vec::new();
        let mut union_index: HashMap<ColumnKey, usize> = HashMap::new();
        let mut layouts: Vec<Vec<usize>> = Vec::with_capacity(tables.len());
        for table in &tables {
            let layout = column_keys(table.columns())
                .into_iter()
                .map(|key| {
                    *union_index.entry(key.clone()).or_insert_with(|| {
                        union.push(key);
                        union.len() - 1
                    })
                })
                .collect();
            layouts.push(layout);
        }

        let width = union.len();
        let columns: Vec<String> = union.into_iter().map(|(name, _)| name).collect();
        let mut merged = RecordTable::new(columns);
        let mut seen: HashSet<Record> = HashSet::new();
        let mut total_fetched = 0;
        let mut duplicates_removed = 0;

        for (table, layout) in tables.into_iter().zip(layouts) {
            let aligned = layout.iter().copied().eq(0..layout.len()) && layout.len() == width;
            let (_, records) = table.into_parts();
            for record in records {
                total_fetched += 1;
                let record = if aligned && record.len() == width {
                    record
                } else {
                    align(&record, &layout, width)
                };
                if seen.insert(record.clone()) {
                    merged.push(record);
                } else {
                    duplicates_removed += 1;
                }
            }
        }

        failures.sort_by_key(|f| f.window);

        debug!(
            total_fetched,
            duplicates_removed,
            kept = merged.len(),
            failed = failures.len(),
            "aggregated outcomes"
        );

        AggregateResult {
            table: merged,
            total_fetched,
            duplicates_removed,
            windows_succeeded,
            failures,
        }
    }
}

/// Places each value at its union position. Values beyond the header are
/// dropped; missing values are empty.
fn align(record: &Record, layout: &[usize], width: usize) -> Record {
    let mut values = vec![String::new(); width];
    for (value, &slot) in record.values().iter().zip(layout) {
        values[slot].clone_from(value);
    }
    Record::new(values)
}

/// Aggregates outcomes in the order given.
#[must_use]
pub fn aggregate(outcomes: impl IntoIterator<Item = FetchOutcome>) -> AggregateResult {
    let mut aggregator = ResultAggregator::new();
    for outcome in outcomes {
        aggregator.push(outcome);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gwdata_types::{FailureCause, partition};

    fn cols() -> Vec<String> {
        vec!["station".into(), "date".into(), "level".into()]
    }

    fn rec(station: &str, level: &str) -> Record {
        [station, "2023-01-01", level].into_iter().collect()
    }

    fn day(d: u32) -> DateWindow {
        let date = NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
        DateWindow {
            start: date,
            end: date,
        }
    }

    fn success(window: DateWindow, records: Vec<Record>) -> FetchOutcome {
        FetchOutcome::Success {
            window,
            records: RecordTable::with_records(cols(), records),
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let windows = partition(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
            15,
        )
        .unwrap();
        let (a, b, c) = (rec("A", "1"), rec("B", "2"), rec("C", "3"));

        let result = aggregate(vec![
            success(windows[0], vec![a.clone(), b.clone()]),
            success(windows[1], vec![b.clone(), c.clone()]),
        ]);

        assert_eq!(result.table.records(), [a, b, c]);
        assert_eq!(result.total_fetched, 4);
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.failed_windows().count(), 0);
        assert_eq!(result.windows_succeeded, 2);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let first = aggregate(vec![
            success(day(1), vec![rec("A", "1"), rec("A", "1"), rec("B", "2")]),
            success(day(2), vec![rec("B", "2"), rec("C", "3")]),
        ]);
        assert_eq!(first.duplicates_removed, 2);

        let second = aggregate(vec![FetchOutcome::Success {
            window: day(1),
            records: first.table.clone(),
        }]);

        assert_eq!(second.table, first.table);
        assert_eq!(second.duplicates_removed, 0);
    }

    #[test]
    fn test_order_within_and_across_outcomes() {
        let result = aggregate(vec![
            success(day(1), vec![rec("Z", "9"), rec("Y", "8")]),
            success(day(2), vec![rec("X", "7")]),
        ]);
        let stations: Vec<_> = result
            .table
            .records()
            .iter()
            .map(|r| r.get(0).unwrap())
            .collect();
        assert_eq!(stations, ["Z", "Y", "X"]);
    }

    #[test]
    fn test_all_failures() {
        let result = aggregate(vec![
            FetchOutcome::failure(day(3), FailureCause::Http { status: 500 }),
            FetchOutcome::failure(day(1), FailureCause::Transport("timeout".into())),
            FetchOutcome::failure(day(2), FailureCause::Cancelled),
        ]);

        assert!(result.is_empty());
        assert!(result.all_failed());
        assert_eq!(result.total_fetched, 0);
        let failed: Vec<_> = result.failed_windows().collect();
        assert_eq!(failed, [day(1), day(2), day(3)]);
    }

    #[test]
    fn test_mixed_outcomes() {
        let result = aggregate(vec![
            success(day(1), vec![rec("A", "1")]),
            FetchOutcome::failure(day(2), FailureCause::Parse("bad".into())),
            success(day(3), vec![]),
        ]);

        assert_eq!(result.len(), 1);
        assert!(!result.all_failed());
        assert_eq!(result.windows_succeeded, 2);
        assert_eq!(result.failures[0].cause, FailureCause::Parse("bad".into()));
    }

    #[test]
    fn test_columns_are_unioned() {
        let first = FetchOutcome::Success {
            window: day(1),
            records: RecordTable::with_records(
                vec!["station".into(), "level".into()],
                vec![["A", "1"].into_iter().collect()],
            ),
        };
        let second = FetchOutcome::Success {
            window: day(2),
            records: RecordTable::with_records(
                vec!["level".into(), "station".into(), "well_type".into()],
                vec![
                    ["1", "A", ""].into_iter().collect(),
                    ["2", "B", "dug"].into_iter().collect(),
                ],
            ),
        };

        let result = aggregate(vec![first, second]);

        assert_eq!(result.table.columns(), ["station", "level", "well_type"]);
        let rows: Vec<_> = result.table.records().iter().map(Record::values).collect();
        assert_eq!(rows, [["A", "1", ""], ["B", "2", "dug"]]);
        assert_eq!(result.duplicates_removed, 1);
    }

    #[test]
    fn test_empty_tables_contribute_nothing() {
        let result = aggregate(vec![FetchOutcome::Success {
            window: day(1),
            records: RecordTable::default(),
        }]);
        assert!(result.table.columns().is_empty());
        assert!(result.is_empty());
        assert!(!result.all_failed());
    }

    #[test]
    fn test_streaming_push_matches_aggregate() {
        let outcomes = vec![
            success(day(1), vec![rec("A", "1")]),
            success(day(2), vec![rec("A", "1")]),
        ];
        let mut aggregator = ResultAggregator::new();
        for outcome in outcomes.clone() {
            aggregator.push(outcome);
        }
        assert_eq!(aggregator.finish(), aggregate(outcomes));
    }
}
