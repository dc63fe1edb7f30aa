//! Data dictionary of the table questions are asked against

use super::table::Cell;
use serde::Serialize;

/// One column of the target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Declared type as reported by the store, possibly empty
    pub declared_type: String,
}

/// Column names, declared types and a few sample rows
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableProfile {
    pub table: String,
    pub columns: Vec<ColumnProfile>,
    pub samples: Vec<Vec<Cell>>,
}

impl TableProfile {
    pub const SAMPLE_ROWS: usize = 3;

    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.columns.push(ColumnProfile {
            name: name.into(),
            declared_type: declared_type.into(),
        });
        self
    }

    pub fn with_samples(mut self, mut samples: Vec<Vec<Cell>>) -> Self {
        samples.truncate(Self::SAMPLE_ROWS);
        self.samples = samples;
        self
    }

    /// Text block embedded in participant prompts
    pub fn render(&self) -> String {
        let mut out = format!("Table: {}\nColumns:\n", self.table);
        for column in &self.columns {
            if column.declared_type.is_empty() {
                out.push_str(&format!("- {}\n", column.name));
            } else {
                out.push_str(&format!("- {} ({})\n", column.name, column.declared_type));
            }
        }
        if !self.samples.is_empty() {
            out.push_str("Sample rows:\n");
            for row in &self.samples {
                let cells: Vec<String> = row
                    .iter()
                    .map(|cell| cell.to_text().unwrap_or_else(|| "NULL".to_string()))
                    .collect();
                out.push_str(&format!("| {} |\n", cells.join(" | ")));
            }
        }
        out
    }
}
