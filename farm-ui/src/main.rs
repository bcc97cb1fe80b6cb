use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use farm_ui::config::{self, CliOverrides, EnvOverrides, FileConfig};
use farm_ui::{app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Smart Farm Advisor.
///
/// Walks through crop, soil and cultivation questions, then asks the advisor
/// backend for a yield estimate and a fertilizer recommendation with short
/// AI-written explanations.
#[derive(Debug, Parser)]
#[command(name = "farm-advisor", version)]
struct Cli {
    /// TOML config file with [service] and [logging] tables.
    #[arg(long, env = "FARM_ADVISOR_CONFIG")]
    config: Option<PathBuf>,

    /// Advisor backend to use.
    #[arg(long)]
    backend: Option<String>,

    /// Root URL of the advisor backend (e.g. `http://localhost:8000`).
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Text-generation model for the summaries; the backend default when unset.
    #[arg(long)]
    model: Option<String>,

    /// Log filter, a level (`debug`) or full directive (`farm_core=trace,info`).
    #[arg(long)]
    log_level: Option<String>,

    /// Append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Hide log output on the console.
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            backend: self.backend.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            text_model: self.model.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = config::resolve(file, EnvOverrides::from_process(), cli.overrides())?;

    logging::set_log_level(&settings.log_level)?;
    if let Some(path) = &settings.log_file {
        logging::enable_file_logging(path)?;
    }

    debug!(backend = %settings.service.backend, "connecting");
    let aggregator = app::connect(&settings).await?;
    info!(base_url = %settings.service.base_url, "farm advisor started");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    app::run(aggregator, stdin, std::io::stdout())
        .await
        .context("session failed")?;

    logging::disable_file_logging();
    Ok(())
}
