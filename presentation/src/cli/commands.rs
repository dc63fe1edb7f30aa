//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for session outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Narrative, query, classification and result rows
    Full,
    /// Only the narrative
    Summary,
    /// The outcome as JSON
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Summary => council_domain::OutputFormat::Summary,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for tabular-council
#[derive(Parser, Debug)]
#[command(name = "tabular-council")]
#[command(author, version, about = "Ask questions about a table; a council of participants writes, reviews and runs the SQL")]
#[command(long_about = r#"
Tabular Council answers a natural-language question about one SQL table.

A planner drafts a checklist, an author writes the query (probing the table
with tools), a critic reviews it, the query is executed and classified, and a
summarizer turns a bounded result into a short narrative. Retry limits and a
round ceiling keep every session finite.

Configuration files are loaded from (in priority order):
1. --config <path>      Explicit config file
2. ./council.toml       Project-level config
3. ~/.config/tabular-council/config.toml   Global config

Example:
  tabular-council --db sales.db --table sales "Top 5 cities by revenue in 2023"
  tabular-council -o full --export rows.json "All orders above 1000"
  tabular-council --lookup "pune city" --column City
"#)]
pub struct Cli {
    /// The question to ask (not required in lookup mode)
    pub question: Option<String>,

    /// SQLite database file
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Table the question is asked against
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    /// Model used by every reasoning participant
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Transcript length at which the session is cut off
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<usize>,

    /// Output format (defaults to the configured format, then summary)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the full result rows as JSON records to this file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Resolve a free-text value against a column instead of running a session
    #[arg(long, value_name = "PHRASE", requires = "column")]
    pub lookup: Option<String>,

    /// Column searched by --lookup
    #[arg(long, value_name = "NAME", requires = "lookup")]
    pub column: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
