//! Keyword-overlap ranking of a column's distinct values

use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Default number of candidates returned
pub const DEFAULT_CANDIDATE_LIMIT: usize = 15;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("lookup phrase '{0}' has no alphabetic keywords")]
    EmptyLookup(String),
}

/// A distinct value with its match score in `[0, 100]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateValue {
    pub value: Option<String>,
    pub score: f64,
}

/// Ranked values for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMatches {
    pub column: String,
    pub values: Vec<Option<String>>,
}

impl ValueMatches {
    /// `{"<column>": [values...]}`
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(
            self.column.clone(),
            serde_json::to_value(&self.values).unwrap_or_default(),
        );
        serde_json::Value::Object(object)
    }
}

/// Keep ASCII letters and whitespace, lowercase, split into a keyword set
pub fn keywords(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Scores column values by the share of lookup keywords they contain
#[derive(Debug, Clone)]
pub struct FuzzyValueResolver {
    limit: usize,
}

impl Default for FuzzyValueResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_LIMIT)
    }
}

impl FuzzyValueResolver {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Score every value, highest first; ties keep enumeration order.
    ///
    /// The denominator is always the lookup's keyword count, so extra words
    /// in a value never lower its score. Null values score 0.
    pub fn score(
        &self,
        lookup: &str,
        values: &[Option<String>],
    ) -> Result<Vec<CandidateValue>, ResolveError> {
        let wanted = keywords(lookup);
        if wanted.is_empty() {
            return Err(ResolveError::EmptyLookup(lookup.to_string()));
        }

        let mut scored: Vec<CandidateValue> = values
            .iter()
            .map(|value| {
                let score = match value {
                    Some(text) => {
                        let hits = keywords(text).intersection(&wanted).count();
                        hits as f64 / wanted.len() as f64 * 100.0
                    }
                    None => 0.0,
                };
                CandidateValue {
                    value: value.clone(),
                    score,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scored)
    }

    /// Top values for `column`, scores dropped
    ///
    /// # Examples
    ///
    /// ```
    /// use council_domain::resolver::FuzzyValueResolver;
    ///
    /// let values = vec![Some("Mumbai".to_string()), Some("Pune".to_string())];
    /// let matches = FuzzyValueResolver::default()
    ///     .resolve("pune city", "City", &values)
    ///     .unwrap();
    /// assert_eq!(matches.values[0].as_deref(), Some("Pune"));
    /// ```
    pub fn resolve(
        &self,
        lookup: &str,
        column: &str,
        values: &[Option<String>],
    ) -> Result<ValueMatches, ResolveError> {
        let values = self
            .score(lookup, values)?
            .into_iter()
            .take(self.limit)
            .map(|candidate| candidate.value)
            .collect();
        Ok(ValueMatches {
            column: column.to_string(),
            values,
        })
    }
}
