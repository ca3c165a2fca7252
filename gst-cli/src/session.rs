//! Interactive calculator session.
//!
//! Each line read from the user is parsed into a [`Command`]. Commands that
//! change the input rebuild the [`CalculationInput`], recompute, and hand the
//! result to the [`HistoryRecorder`], which records it once typing pauses.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use gst_core::calculations::{PriceCategory, PriceProjector, ProjectionError};
use gst_core::input::{InputError, parse_amount, parse_rate, select_preset};
use gst_core::{
    CalculationInput, HistoryEntry, HistoryRecorder, HistoryStore, Jurisdiction, PriceBasis,
    TaxEngine,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::AppConfig;
use crate::logging::log_task_error;
use crate::render;

const PROMPT: &str = "gst> ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("'{0}' is not a number of years")]
    InvalidYears(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Amount(Decimal),
    /// Raw text; checked against the configured presets when applied.
    Preset(String),
    CustomRate(Decimal),
    Basis(PriceBasis),
    Jurisdiction(Jurisdiction),
    History,
    Clear,
    Predict { category: PriceCategory, years: u32 },
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, SessionError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(SessionError::UnknownCommand(String::new()));
        };
        let rest = words.collect::<Vec<_>>().join(" ");

        let command = match name.to_ascii_lowercase().as_str() {
            "amount" | "a" => Self::Amount(parse_amount(&rest)),
            "rate" | "r" => {
                if rest.is_empty() {
                    return Err(SessionError::MissingArgument {
                        command: "rate",
                        argument: "a preset",
                    });
                }
                Self::Preset(rest)
            }
            "custom" => Self::CustomRate(parse_rate(&rest)),
            "excl" | "exclusive" => Self::Basis(PriceBasis::Exclusive),
            "incl" | "inclusive" => Self::Basis(PriceBasis::Inclusive),
            "intra" => Self::Jurisdiction(Jurisdiction::IntraState),
            "inter" => Self::Jurisdiction(Jurisdiction::InterState),
            "history" | "h" => Self::History,
            "clear" => Self::Clear,
            "predict" => Self::parse_predict(&rest)?,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(SessionError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }

    fn parse_predict(args: &str) -> Result<Self, SessionError> {
        let mut words = args.split_whitespace();
        let (Some(category), Some(years)) = (words.next(), words.next()) else {
            return Err(SessionError::MissingArgument {
                command: "predict",
                argument: "a category and a number of years",
            });
        };

        let category = PriceCategory::parse(category)
            .ok_or_else(|| SessionError::UnknownCategory(category.to_string()))?;
        let years = years
            .parse::<u32>()
            .map_err(|_| SessionError::InvalidYears(years.to_string()))?;
        Ok(Self::Predict { category, years })
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Session {
    input: CalculationInput,
    presets: Vec<Decimal>,
    engine: TaxEngine,
    projector: PriceProjector,
    recorder: HistoryRecorder,
}

impl Session {
    pub fn new(
        history: Arc<HistoryStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            input: CalculationInput::default().with_rate(config.calculator.default_rate),
            presets: config.calculator.presets.clone(),
            engine: TaxEngine::new(),
            projector: PriceProjector::new(),
            recorder: HistoryRecorder::new(history, config.debounce()),
        }
    }

    pub fn input(&self) -> CalculationInput {
        self.input
    }

    pub fn has_pending_write(&self) -> bool {
        self.recorder.is_pending()
    }

    pub async fn handle(
        &mut self,
        command: Command,
    ) -> Result<Reply, SessionError> {
        debug!(?command, "session command");
        let next = match command {
            Command::Amount(amount) => self.input.with_amount(amount),
            Command::Preset(text) => self.input.with_rate(select_preset(&text, &self.presets)?),
            Command::CustomRate(rate) => self.input.with_rate(rate),
            Command::Basis(basis) => self.input.with_price_basis(basis),
            Command::Jurisdiction(jurisdiction) => self.input.with_jurisdiction(jurisdiction),
            Command::History => {
                let entries = self.recorder.history().list().await;
                return Ok(Reply::Text(render::render_history(&entries)));
            }
            Command::Clear => {
                self.recorder.cancel();
                self.recorder.history().clear().await;
                return Ok(Reply::Text("History cleared.\n".to_string()));
            }
            Command::Predict { category, years } => {
                let projection = self.projector.project(self.input.amount, category, years)?;
                return Ok(Reply::Text(render::render_projection(
                    category,
                    years,
                    &projection,
                )));
            }
            Command::Help => return Ok(Reply::Text(render::render_help(&self.presets))),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Text(self.recalculate(next)))
    }

    fn recalculate(
        &mut self,
        input: CalculationInput,
    ) -> String {
        self.input = input;
        let result = self.engine.compute(&input);

        if input.amount > Decimal::ZERO {
            self.recorder
                .schedule(HistoryEntry::from_calculation(&input, &result));
        } else {
            self.recorder.cancel();
        }

        render::render_breakdown(&input, &result)
    }
}

/// Runs `session` over `lines` until `quit` or the end of input. A write
/// still waiting when the session ends is dropped.
pub async fn run<W: Write>(
    mut session: Session,
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
) -> anyhow::Result<()> {
    writeln!(out, "GST calculator. Type `help` for commands.")?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    while let Some(line) = lines.recv().await {
        if !line.trim().is_empty() {
            let reply = match Command::parse(&line) {
                Ok(command) => session.handle(command).await,
                Err(error) => Err(error),
            };
            match reply {
                Ok(Reply::Text(text)) => write!(out, "{text}")?,
                Ok(Reply::Quit) => break,
                Err(error) => writeln!(out, "{error}. Type `help` for commands.")?,
            }
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    if session.has_pending_write() {
        debug!("session ended with a pending history write");
    }
    Ok(())
}

/// Reads stdin on a dedicated thread and forwards each line.
///
/// A plain thread rather than a blocking task: a read blocked on the
/// terminal would otherwise hold up runtime shutdown.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        log_task_error("stdin reader", forward_lines(std::io::stdin().lock(), &tx));
    });
    rx
}

fn forward_lines(
    reader: impl BufRead,
    tx: &mpsc::Sender<String>,
) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line.context("failed to read from stdin")?;
        if tx.blocking_send(line).is_err() {
            break;
        }
    }
    Ok(())
}
