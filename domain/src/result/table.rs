//! Tabular result payloads and their deterministic ordering

use crate::core::error::DomainError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// A single value in a result row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Cell::Integer(_) | Cell::Real(_))
    }

    fn type_rank(&self) -> u8 {
        match self {
            Cell::Integer(_) => 0,
            Cell::Real(_) => 1,
            Cell::Timestamp(_) => 2,
            Cell::Text(_) => 3,
            Cell::Null => 4,
        }
    }

    /// Total order over non-null cells, ascending.
    ///
    /// Numbers compare numerically across integer/real, then by variant so
    /// that `Equal` only ever holds for identical cells.
    fn ascending_cmp(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Integer(a), Cell::Integer(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let (x, y) = (a.as_f64(), b.as_f64());
                x.total_cmp(&y).then(a.type_rank().cmp(&b.type_rank()))
            }
            (Cell::Timestamp(a), Cell::Timestamp(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }

    /// Descending order with nulls last
    fn descending_cmp(&self, other: &Cell) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => other.ascending_cmp(self),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Cell::Integer(i) => *i as f64,
            Cell::Real(r) => *r,
            _ => f64::NAN,
        }
    }

    /// Parse ISO-8601 date or date-time text
    pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
        const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
        let text = text.trim();
        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Plain-text rendering, `None` for null
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Integer(i) => Some(i.to_string()),
            Cell::Real(r) => Some(r.to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Timestamp(t) => Some(t.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Null => serde_json::Value::Null,
            Cell::Integer(i) => serde_json::Value::from(*i),
            Cell::Real(r) => serde_json::Number::from_f64(*r)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Cell::Text(_) | Cell::Timestamp(_) => {
                serde_json::Value::String(self.to_text().unwrap_or_default())
            }
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Column group used by the result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Temporal,
    Textual,
}

/// A rectangular query result
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table, rejecting rows whose width differs from the header
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, DomainError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(DomainError::RaggedRow {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Kind of column `index`, judged from its non-null cells.
    ///
    /// All-null columns count as textual.
    pub fn column_kind(&self, index: usize) -> ColumnKind {
        let mut values = self
            .rows
            .iter()
            .map(|row| &row[index])
            .filter(|cell| !cell.is_null())
            .peekable();

        if values.peek().is_none() {
            return ColumnKind::Textual;
        }

        let mut numeric = true;
        let mut temporal = true;
        for cell in values {
            numeric &= cell.is_numeric();
            temporal &= matches!(cell, Cell::Timestamp(_));
        }

        if numeric {
            ColumnKind::Numeric
        } else if temporal {
            ColumnKind::Temporal
        } else {
            ColumnKind::Textual
        }
    }

    /// Column indices in sort precedence: numeric, then temporal, then
    /// textual, each group in header order.
    pub fn sort_key_columns(&self) -> Vec<usize> {
        let kinds: Vec<_> = (0..self.columns.len())
            .map(|i| self.column_kind(i))
            .collect();
        [ColumnKind::Numeric, ColumnKind::Temporal, ColumnKind::Textual]
            .into_iter()
            .flat_map(|group| {
                kinds
                    .iter()
                    .enumerate()
                    .filter(move |(_, kind)| **kind == group)
                    .map(|(i, _)| i)
            })
            .collect()
    }

    /// Sort rows descending by the column groups of [`Self::sort_key_columns`].
    ///
    /// Every column takes part in the key, so the output order depends only
    /// on the cell values, never on the input row order.
    pub fn sorted_descending(mut self) -> Self {
        let keys = self.sort_key_columns();
        self.rows.sort_by(|a, b| {
            keys.iter()
                .map(|&i| a[i].descending_cmp(&b[i]))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        self
    }

    /// Turn text columns whose every non-null value is an ISO date or
    /// date-time into timestamp columns
    pub fn with_temporal_columns(mut self) -> Self {
        for index in 0..self.columns.len() {
            let mut values = self
                .rows
                .iter()
                .map(|row| &row[index])
                .filter(|cell| !cell.is_null())
                .peekable();
            if values.peek().is_none() {
                continue;
            }
            let temporal = values.all(|cell| match cell {
                Cell::Text(text) => Cell::parse_timestamp(text).is_some(),
                _ => false,
            });
            if !temporal {
                continue;
            }
            for row in &mut self.rows {
                if let Cell::Text(text) = &row[index] {
                    if let Some(timestamp) = Cell::parse_timestamp(text) {
                        row[index] = Cell::Timestamp(timestamp);
                    }
                }
            }
        }
        self
    }

    /// Keep only the first `limit` rows
    pub fn truncated(mut self, limit: usize) -> Self {
        self.rows.truncate(limit);
        self
    }

    /// Rows as a JSON array of `{column: value}` records
    pub fn to_records(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let record: serde_json::Map<_, _> = self
                        .columns
                        .iter()
                        .cloned()
                        .zip(row.iter().map(Cell::to_json))
                        .collect();
                    serde_json::Value::Object(record)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn day(y: i32, m: u32, d: u32) -> Cell {
        Cell::Timestamp(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    fn sample() -> Table {
        Table::new(
            vec!["Region".into(), "Month".into(), "Units".into()],
            vec![
                vec![text("EU"), day(2023, 1, 1), Cell::Integer(10)],
                vec![text("NA"), day(2023, 2, 1), Cell::Integer(30)],
                vec![text("APAC"), day(2023, 1, 1), Cell::Integer(30)],
                vec![text("LATAM"), Cell::Null, Cell::Real(12.5)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Table::new(vec!["a".into()], vec![vec![Cell::Null, Cell::Null]]).unwrap_err();
        assert!(matches!(err, DomainError::RaggedRow { row: 0, .. }));
    }

    #[test]
    fn test_column_kinds() {
        let table = sample();
        assert_eq!(table.column_kind(0), ColumnKind::Textual);
        assert_eq!(table.column_kind(1), ColumnKind::Temporal);
        assert_eq!(table.column_kind(2), ColumnKind::Numeric);
    }

    #[test]
    fn test_sort_key_precedence() {
        assert_eq!(sample().sort_key_columns(), vec![2, 1, 0]);
    }

    #[test]
    fn test_sorted_descending() {
        let sorted = sample().sorted_descending();
        let regions: Vec<_> = sorted
            .rows()
            .iter()
            .map(|row| row[0].to_text().unwrap())
            .collect();
        // Units desc; ties broken by month desc
        assert_eq!(regions, vec!["NA", "APAC", "LATAM", "EU"]);
    }

    #[test]
    fn test_sort_is_independent_of_input_order() {
        let table = sample();
        let mut reversed_rows = table.rows().to_vec();
        reversed_rows.reverse();
        let reversed = Table::new(table.columns().to_vec(), reversed_rows).unwrap();

        assert_eq!(table.sorted_descending(), reversed.sorted_descending());
    }

    #[test]
    fn test_nulls_sort_last() {
        let table = Table::new(
            vec!["Units".into()],
            vec![vec![Cell::Null], vec![Cell::Integer(1)], vec![Cell::Integer(5)]],
        )
        .unwrap()
        .sorted_descending();
        assert_eq!(
            table.rows(),
            &[vec![Cell::Integer(5)], vec![Cell::Integer(1)], vec![Cell::Null]]
        );
    }

    #[test]
    fn test_mixed_numeric_tie_is_deterministic() {
        let a = Table::new(
            vec!["v".into()],
            vec![vec![Cell::Real(1.0)], vec![Cell::Integer(1)]],
        )
        .unwrap();
        let b = Table::new(
            vec!["v".into()],
            vec![vec![Cell::Integer(1)], vec![Cell::Real(1.0)]],
        )
        .unwrap();
        assert_eq!(a.sorted_descending(), b.sorted_descending());
    }

    #[test]
    fn test_to_records() {
        let table = Table::new(
            vec!["Region".into(), "Units".into()],
            vec![vec![text("EU"), Cell::Integer(3)]],
        )
        .unwrap();
        assert_eq!(
            table.to_records(),
            serde_json::json!([{"Region": "EU", "Units": 3}])
        );
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            Cell::parse_timestamp("2023-04-01"),
            NaiveDate::from_ymd_opt(2023, 4, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert!(Cell::parse_timestamp("2023-04-01 10:30:00").is_some());
        assert!(Cell::parse_timestamp("2023-04-01T10:30:00.250").is_some());
        assert!(Cell::parse_timestamp("April 1st").is_none());
        assert!(Cell::parse_timestamp("2023").is_none());
    }

    #[test]
    fn test_temporal_promotion() {
        let table = Table::new(
            vec!["Date".into(), "Note".into()],
            vec![
                vec![text("2023-01-05"), text("2023-01-05")],
                vec![Cell::Null, text("soon")],
                vec![text("2023-03-01 08:00:00"), Cell::Null],
            ],
        )
        .unwrap()
        .with_temporal_columns();
        assert_eq!(table.column_kind(0), ColumnKind::Temporal);
        assert_eq!(table.column_kind(1), ColumnKind::Textual);
        assert_eq!(table.rows()[1][0], Cell::Null);

        let sorted = table.sorted_descending();
        assert_eq!(
            sorted.rows()[0][0],
            Cell::Timestamp(
                NaiveDate::from_ymd_opt(2023, 3, 1)
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap()
            )
        );
        assert_eq!(sorted.rows()[2][0], Cell::Null);
    }

    #[test]
    fn test_all_null_column_is_textual() {
        let table = Table::new(vec!["x".into()], vec![vec![Cell::Null]]).unwrap();
        assert_eq!(table.column_kind(0), ColumnKind::Textual);
    }
}
