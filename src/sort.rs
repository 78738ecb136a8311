use std::cmp::Ordering;
use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use tracing::trace;

use crate::column::{Column, Format};
use crate::format::parse_instant;
use crate::record::{Record, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }
}

/// How values of a column are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Numbers numerically, everything else case-insensitively as text.
    Natural,
    /// Values parsed as date-time instants.
    Temporal,
}

impl Strategy {
    pub fn for_column(column: &Column, temporal_field: Option<&str>) -> Self {
        if column.format == Format::Date || temporal_field == Some(column.accessor.as_str()) {
            Strategy::Temporal
        } else {
            Strategy::Natural
        }
    }
}

/// Comparable form of a cell value.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    Instant(DateTime<FixedOffset>),
    Missing,
}

impl SortKey {
    fn new(value: Option<&Value>, strategy: Strategy) -> Self {
        let Some(value) = value.filter(|v| !v.is_blank()) else {
            return SortKey::Missing;
        };
        match strategy {
            Strategy::Temporal => parse_instant(value)
                .map(SortKey::Instant)
                .unwrap_or(SortKey::Missing),
            Strategy::Natural => match value.as_number() {
                Some(n) => SortKey::Number(n),
                None => SortKey::Text(value.as_text().to_lowercase()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) | SortKey::Instant(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Missing => 2,
        }
    }
}

// Missing keys go last whatever the direction; only present keys are
// reversed for a descending sort.
fn compare(a: &SortKey, b: &SortKey, direction: Direction) -> Ordering {
    let ordering = match (a, b) {
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Instant(x), SortKey::Instant(y)) => x.cmp(y),
        (x, y) => x.rank().cmp(&y.rank()),
    };
    match direction {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
    }
}

/// Orders `rows` (positions into `records`) by the value under `accessor`.
///
/// The sort is stable: rows that compare equal keep their input order.
pub fn sort_rows(
    records: &[Record],
    rows: &[usize],
    accessor: &str,
    strategy: Strategy,
    direction: Direction,
) -> Vec<usize> {
    let start_time = Instant::now();

    // Create a vector of (original_index, key) pairs so every value is only parsed once
    let mut indexed_rows: Vec<(usize, SortKey)> = rows
        .iter()
        .map(|&row_idx| {
            let value = records.get(row_idx).and_then(|r| r.get(accessor));
            (row_idx, SortKey::new(value, strategy))
        })
        .collect();

    indexed_rows.sort_by(|(_, a), (_, b)| compare(a, b, direction));

    trace!(
        "Sorted {} rows by {} ({:?}, {:?}) in {}ms",
        indexed_rows.len(),
        accessor,
        strategy,
        direction,
        start_time.elapsed().as_millis()
    );
    indexed_rows.into_iter().map(|(i, _)| i).collect()
}

/// Orders `rows` by the active column of `columns`, if any.
pub fn sort_by_active(
    records: &[Record],
    rows: Vec<usize>,
    columns: &[Column],
    temporal_field: Option<&str>,
) -> Vec<usize> {
    match columns.iter().find(|c| c.sorting) {
        Some(column) => sort_rows(
            records,
            &rows,
            &column.accessor,
            Strategy::for_column(column, temporal_field),
            Direction::from_ascending(column.ascending),
        ),
        None => rows,
    }
}
