//! Console output formatter for session outcomes

use colored::Colorize;
use council_domain::{
    OutputFormat, ResultPayload, SessionOutcome, Table, Termination, ValueMatches,
};

/// Rows printed by the full format before the table is cut
pub const DISPLAY_ROWS: usize = 50;

/// Formats session outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format `outcome` in the requested format
    pub fn render(outcome: &SessionOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(outcome),
            OutputFormat::Summary => Self::format_summary(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Format the complete outcome
    pub fn format(outcome: &SessionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Tabular Council"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            outcome.question
        ));
        output.push_str(&format!(
            "{} {} after {} messages\n",
            "Outcome:".cyan().bold(),
            Self::termination_label(&outcome.termination),
            outcome.rounds
        ));
        if let Some(classification) = outcome.classification {
            output.push_str(&format!(
                "{} {}\n",
                "Result size:".cyan().bold(),
                classification
            ));
        }

        if let Some(query) = &outcome.query {
            output.push_str(&Self::section_header("Query"));
            output.push_str(&format!("{}\n", query.yellow()));
        }

        match &outcome.payload {
            Some(ResultPayload::Rows { table }) => {
                output.push_str(&Self::section_header("Result"));
                output.push_str(&Self::format_table(table, DISPLAY_ROWS));
            }
            Some(ResultPayload::Overflow { row_count, .. }) => {
                output.push_str(&Self::section_header("Result"));
                output.push_str(&format!(
                    "{} rows; use --export <path> to write them out\n",
                    row_count
                ));
            }
            None => {}
        }

        output.push_str(&Self::section_header("Answer"));
        output.push_str(&format!("{}\n", outcome.narrative));

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &SessionOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Narrative only (concise output)
    pub fn format_summary(outcome: &SessionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n\n", "Q:".bold(), outcome.question));
        output.push_str(&outcome.narrative);
        output.push('\n');

        if !outcome.is_completed() {
            output.push_str(&format!(
                "\n{}\n",
                format!("({})", Self::termination_label(&outcome.termination)).dimmed()
            ));
        }

        output
    }

    /// Ranked values from standalone lookup mode
    pub fn format_matches(lookup: &str, matches: &ValueMatches) -> String {
        let mut output = format!(
            "{} '{}' in {}\n",
            "Closest values to".cyan().bold(),
            lookup,
            matches.column
        );
        if matches.values.is_empty() {
            output.push_str("  (no values)\n");
        }
        for (rank, value) in matches.values.iter().enumerate() {
            output.push_str(&format!(
                "  {:>2}. {}\n",
                rank + 1,
                value.as_deref().unwrap_or("NULL")
            ));
        }
        output
    }

    /// Plain aligned table, at most `limit` rows
    pub fn format_table(table: &Table, limit: usize) -> String {
        if table.is_empty() {
            return "(no rows)\n".to_string();
        }

        let cells: Vec<Vec<String>> = table
            .rows()
            .iter()
            .take(limit)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_text().unwrap_or_else(|| "NULL".to_string()))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = table.columns().iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |values: &[String]| -> String {
            values
                .iter()
                .zip(&widths)
                .map(|(value, width)| format!("{:<width$}", value, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut output = String::new();
        output.push_str(&format!("{}\n", line(table.columns()).bold()));
        output.push_str(&format!(
            "{}\n",
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-")
        ));
        for row in &cells {
            output.push_str(&line(row));
            output.push('\n');
        }
        if table.row_count() > limit {
            output.push_str(&format!("... {} more rows\n", table.row_count() - limit));
        }
        output
    }

    pub fn termination_label(termination: &Termination) -> String {
        match termination {
            Termination::Completed => "completed".to_string(),
            Termination::Limited(reason) => format!("stopped: {}", reason),
            Termination::RoundCeiling => "stopped: round ceiling reached".to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Cell, LimitReason, ResultClassification};

    fn table() -> Table {
        Table::new(
            vec!["city".to_string(), "total".to_string()],
            vec![
                vec![Cell::Text("Pune".to_string()), Cell::Integer(1200)],
                vec![Cell::Text("Mumbai".to_string()), Cell::Null],
            ],
        )
        .unwrap()
    }

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            question: "revenue by city".to_string(),
            classification: Some(ResultClassification::Bounded),
            query: Some("SELECT city, SUM(amount) AS total FROM sales GROUP BY city".to_string()),
            payload: Some(ResultPayload::Rows { table: table() }),
            narrative: "Pune leads with 1200.".to_string(),
            termination: Termination::Completed,
            rounds: 9,
        }
    }

    #[test]
    fn test_format_table_aligns_columns() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_table(&table(), 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "city   | total");
        assert_eq!(lines[1], "-------+------");
        assert_eq!(lines[2], "Pune   | 1200");
        assert_eq!(lines[3], "Mumbai | NULL");
    }

    #[test]
    fn test_format_table_cuts_rows() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_table(&table(), 1);
        assert!(text.contains("... 1 more rows"));
        assert!(!text.contains("Mumbai"));
    }

    #[test]
    fn test_full_format_includes_query_and_answer() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::render(&outcome(), OutputFormat::Full);
        assert!(text.contains("SELECT city"));
        assert!(text.contains("Result size: bounded"));
        assert!(text.contains("Pune leads with 1200."));
    }

    #[test]
    fn test_summary_marks_limited_sessions() {
        colored::control::set_override(false);
        let mut limited = outcome();
        limited.termination = Termination::Limited(LimitReason::ResultOverflow);
        let text = ConsoleFormatter::format_summary(&limited);
        assert!(text.contains("(stopped: query returned too many rows)"));

        let completed = ConsoleFormatter::format_summary(&outcome());
        assert!(!completed.contains("stopped"));
    }

    #[test]
    fn test_json_format_parses() {
        let text = ConsoleFormatter::render(&outcome(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["question"], "revenue by city");
        assert_eq!(value["termination"]["kind"], "completed");
    }

    #[test]
    fn test_format_matches_numbers_values() {
        colored::control::set_override(false);
        let matches = ValueMatches {
            column: "City".to_string(),
            values: vec![Some("Pune".to_string()), None],
        };
        let text = ConsoleFormatter::format_matches("pune city", &matches);
        assert!(text.contains(" 1. Pune"));
        assert!(text.contains(" 2. NULL"));
    }
}
