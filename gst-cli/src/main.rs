use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gst_core::calculations::PriceCategory;
use tracing::{debug, warn};

use gst_cli::config::{AppConfig, Overrides};
use gst_cli::{app, logging, render, session};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// GST calculator.
///
/// Splits an amount into net price and GST (CGST + SGST within a state,
/// IGST across states) and keeps a short history of recent calculations.
#[derive(Debug, Parser)]
#[command(name = "gst", version)]
struct Cli {
    /// TOML config file. Defaults to `gst.toml` in the working directory
    /// when it exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store backend for history (`sqlite` or `memory`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store connection string.
    /// For SQLite this is a file path (e.g. `gst.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level or filter directive, e.g. `debug` or `gst_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute GST for one amount.
    Calc {
        amount: String,

        /// Rate in percent, 0 to 100. Defaults to the configured rate.
        #[arg(long)]
        rate: Option<String>,

        /// The amount already includes GST.
        #[arg(long)]
        inclusive: bool,

        /// Inter-state supply (IGST).
        #[arg(long)]
        inter: bool,

        /// Add the result to history.
        #[arg(long)]
        record: bool,
    },
    /// Interactive calculator (the default).
    Session,
    /// List recent calculations, newest first.
    History,
    /// Forget recent calculations.
    ClearHistory,
    /// Project a price forward.
    Predict {
        amount: String,

        #[arg(long, default_value = "electronics", value_parser = parse_category)]
        category: PriceCategory,

        #[arg(long, default_value_t = 1)]
        years: u32,
    },
    /// Compute every row of a CSV file (`amount,rate,basis,jurisdiction`).
    Batch { file: PathBuf },
}

fn parse_category(s: &str) -> Result<PriceCategory, String> {
    PriceCategory::parse(s).ok_or_else(|| {
        let known = PriceCategory::all()
            .iter()
            .map(PriceCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown category '{s}' (expected one of: {known})")
    })
}

// ─── logging ─────────────────────────────────────────────────────────────────

fn apply_logging(config: &AppConfig) {
    if let Some(level) = &config.logging.level {
        if let Err(error) = logging::set_log_level(level) {
            warn!(%error, "keeping default log level");
        }
    }
    if let Some(path) = &config.logging.file {
        if let Err(error) = logging::enable_file_logging(path) {
            warn!(%error, "file logging disabled");
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let mut config = AppConfig::discover(cli.config.as_deref()).context("failed to load config")?;
    config.apply_overrides(Overrides {
        backend: cli.backend,
        db: cli.db,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });
    apply_logging(&config);
    debug!(?config, "configuration resolved");

    let default_rate = config.calculator.default_rate;
    let mut stdout = io::stdout().lock();

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Calc {
            amount,
            rate,
            inclusive,
            inter,
            record,
        } => {
            let history = app::open_history(&config).await;
            let input = app::input_from_args(&amount, rate.as_deref(), inclusive, inter, default_rate);
            write!(stdout, "{}", app::calculate(&history, &input, record).await)?;
        }
        Commands::Session => {
            let history = app::open_history(&config).await;
            let session = session::Session::new(history, &config);
            session::run(session, session::spawn_stdin_reader(), &mut stdout).await?;
        }
        Commands::History => {
            let history = app::open_history(&config).await;
            write!(stdout, "{}", render::render_history(&history.list().await))?;
        }
        Commands::ClearHistory => {
            app::open_history(&config).await.clear().await;
            writeln!(stdout, "History cleared.")?;
        }
        Commands::Predict {
            amount,
            category,
            years,
        } => {
            write!(stdout, "{}", app::predict(&amount, category, years)?)?;
        }
        Commands::Batch { file } => {
            let report = app::batch(&file, default_rate)
                .with_context(|| format!("batch failed for {}", file.display()))?;
            write!(stdout, "{report}")?;
        }
    }

    stdout.flush()?;
    Ok(())
}
