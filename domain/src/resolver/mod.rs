//! Free-text to stored-category resolution

pub mod fuzzy;

pub use fuzzy::{
    CandidateValue, DEFAULT_CANDIDATE_LIMIT, FuzzyValueResolver, ResolveError, ValueMatches,
    keywords,
};
