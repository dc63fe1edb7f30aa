//! CLI entrypoint for Tabular Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    ResolveValuesUseCase, RunSessionInput, RunSessionUseCase, SessionProgressNotifier,
    TabularStore,
};
use council_domain::{OutputFormat, PromptBook, Question, SessionOutcome};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiParticipantGateway, SqliteTableStore,
};
use council_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    info!("Starting Tabular Council");

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    let params = config.session.to_session_params();

    // === Dependency Injection ===
    let store = Arc::new(
        SqliteTableStore::open(&config.store.path)
            .with_context(|| format!("opening {}", config.store.path.display()))?,
    );

    // Standalone lookup mode
    if let (Some(lookup), Some(column)) = (&cli.lookup, &cli.column) {
        let use_case = ResolveValuesUseCase::new(store, params.resolver(), params.timeout);
        let matches = use_case
            .execute(lookup, &config.store.table, column)
            .await?;
        match format {
            OutputFormat::Json => println!("{}", matches.to_json()),
            _ => print!("{}", ConsoleFormatter::format_matches(lookup, &matches)),
        }
        return Ok(());
    }

    let question: Question = match &cli.question {
        Some(q) => q.parse()?,
        None => bail!("Question is required. Use --lookup/--column to resolve a value."),
    };

    let profile = store.describe(&config.store.table).await?;
    let gateway = Arc::new(OpenAiParticipantGateway::from_config(
        &config.participants,
        PromptBook::new(profile),
    )?);
    info!("Using model {}", gateway.model());

    let mut use_case = RunSessionUseCase::new(gateway, store);
    if let Some(path) = &config.logging.conversation_log {
        let logger = JsonlConversationLogger::new(path)
            .with_context(|| format!("creating conversation log {}", path.display()))?;
        use_case = use_case.with_logger(Arc::new(logger));
    }

    let input = RunSessionInput::new(question).with_params(params);

    // Execute with or without progress reporting
    let output = if cli.quiet {
        use_case.execute(input).await?
    } else {
        let progress: Box<dyn SessionProgressNotifier> = if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };
        use_case
            .execute_with_progress(input, progress.as_ref())
            .await?
    };

    if let Some(path) = &cli.export {
        export_rows(&output.outcome, path)?;
    }

    println!("{}", ConsoleFormatter::render(&output.outcome, format));

    Ok(())
}

/// Merge config files (unless disabled), apply CLI overrides, validate.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("{}", e))?
    };

    if let Some(db) = &cli.db {
        config.store.path = db.clone();
    }
    if let Some(table) = &cli.table {
        config.store.table = table.clone();
    }
    if let Some(model) = &cli.model {
        config.participants.model = model.clone();
    }
    if let Some(max_rounds) = cli.max_rounds {
        config.session.max_rounds = max_rounds;
    }

    config.validate()?;
    Ok(config)
}

/// Write the result rows (including overflow rows) as JSON records.
fn export_rows(outcome: &SessionOutcome, path: &Path) -> Result<()> {
    let Some(payload) = &outcome.payload else {
        warn!("No result rows to export");
        return Ok(());
    };
    let records = serde_json::to_string_pretty(&payload.table().to_records())?;
    std::fs::write(path, records).with_context(|| format!("writing {}", path.display()))?;
    info!("Exported {} rows to {}", payload.table().row_count(), path.display());
    Ok(())
}
