//! Result-cardinality classification

use serde::{Deserialize, Serialize};

/// Default row cap separating bounded from overflow results
pub const DEFAULT_ROW_CAP: usize = 20;

/// Line prefix under which the classification flag is written in executor messages
pub const FLAG_MARKER: &str = "data_size_flag:";

/// Cardinality bucket for a query's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultClassification {
    /// No rows, or the query failed
    Empty,
    /// Exactly one row
    Singleton,
    /// More than one row, up to the cap
    Bounded,
    /// More rows than the cap
    Overflow,
}

impl ResultClassification {
    pub const ALL: [ResultClassification; 4] = [
        ResultClassification::Empty,
        ResultClassification::Singleton,
        ResultClassification::Bounded,
        ResultClassification::Overflow,
    ];

    /// Classify a row count against `cap`
    ///
    /// # Examples
    ///
    /// ```
    /// use council_domain::result::ResultClassification;
    ///
    /// assert_eq!(ResultClassification::from_row_count(0, 20), ResultClassification::Empty);
    /// assert_eq!(ResultClassification::from_row_count(1, 20), ResultClassification::Singleton);
    /// assert_eq!(ResultClassification::from_row_count(20, 20), ResultClassification::Bounded);
    /// assert_eq!(ResultClassification::from_row_count(21, 20), ResultClassification::Overflow);
    /// ```
    pub fn from_row_count(rows: usize, cap: usize) -> Self {
        match rows {
            0 => ResultClassification::Empty,
            1 => ResultClassification::Singleton,
            n if n <= cap => ResultClassification::Bounded,
            _ => ResultClassification::Overflow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultClassification::Empty => "empty",
            ResultClassification::Singleton => "singleton",
            ResultClassification::Bounded => "bounded",
            ResultClassification::Overflow => "overflow",
        }
    }

    /// Flag written into the executor's message text.
    ///
    /// The four flags are textually disjoint.
    pub fn flag(&self) -> &'static str {
        match self {
            ResultClassification::Empty => "zero-limit",
            ResultClassification::Singleton => "one-limit",
            ResultClassification::Bounded => "within-limit",
            ResultClassification::Overflow => "exceeding-limit",
        }
    }

    /// Whether rows are re-ordered before being attached
    pub fn is_sorted(&self) -> bool {
        matches!(
            self,
            ResultClassification::Bounded | ResultClassification::Overflow
        )
    }

    /// Whether the executor message carries the rows inline
    pub fn carries_payload(&self) -> bool {
        !matches!(self, ResultClassification::Overflow)
    }

    /// Read the classification back from executor message text.
    ///
    /// Only the value on the `data_size_flag:` line is considered, and it must
    /// equal one flag exactly, so the result is single-valued.
    pub fn from_message_text(text: &str) -> Option<Self> {
        text.lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix(FLAG_MARKER))
            .and_then(|value| {
                let value = value.trim();
                Self::ALL.into_iter().find(|c| c.flag() == value)
            })
    }
}

impl std::fmt::Display for ResultClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
