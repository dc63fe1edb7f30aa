//! Query drafts, executions and their classification

pub mod classification;
pub mod draft;
pub mod execution;
pub mod profile;
pub mod table;

pub use classification::{DEFAULT_ROW_CAP, ResultClassification};
pub use draft::{ExtractionError, QueryDraft};
pub use execution::QueryExecution;
pub use profile::{ColumnProfile, TableProfile};
pub use table::{Cell, ColumnKind, Table};
