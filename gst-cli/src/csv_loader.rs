//! CSV loader for batch calculations.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive.
//!
//! | Column         | Required | Notes                                         |
//! |----------------|----------|-----------------------------------------------|
//! | `amount`       | yes      | free text, read like typed input (`1,000`)    |
//! | `rate`         | no       | 0 to 100; empty cell means the default rate   |
//! | `basis`        | no       | `excl` or `incl`; empty cell means `excl`     |
//! | `jurisdiction` | no       | `intra` or `inter`; empty cell means `intra`  |
//!
//! ### Example
//!
//! ```csv
//! amount,rate,basis,jurisdiction
//! 1000,18,excl,intra
//! 1180,18,incl,inter
//! 250,,,
//! ```
use std::path::{Path, PathBuf};

use gst_core::input::{parse_amount, parse_rate};
use gst_core::{CalculationInput, Jurisdiction, PriceBasis};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    amount: String,
    #[serde(default)]
    rate: Option<String>,
    #[serde(default)]
    basis: Option<String>,
    #[serde(default)]
    jurisdiction: Option<String>,
}

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// `amount` column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based (header = row 0).
    #[error("unrecognised basis '{value}' on row {row}")]
    InvalidBasis { value: String, row: usize },

    #[error("unrecognised jurisdiction '{value}' on row {row}")]
    InvalidJurisdiction { value: String, row: usize },
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|value| !value.trim().is_empty())
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
    default_rate: Decimal,
) -> Result<CalculationInput, CsvLoadError> {
    let price_basis = match non_empty(row.basis) {
        Some(value) => PriceBasis::parse(&value).ok_or(CsvLoadError::InvalidBasis {
            value,
            row: row_number,
        })?,
        None => PriceBasis::default(),
    };
    let jurisdiction = match non_empty(row.jurisdiction) {
        Some(value) => {
            Jurisdiction::parse(&value).ok_or(CsvLoadError::InvalidJurisdiction {
                value,
                row: row_number,
            })?
        }
        None => Jurisdiction::default(),
    };
    let rate = non_empty(row.rate).map_or(default_rate, |value| parse_rate(&value));

    Ok(CalculationInput::new(
        parse_amount(&row.amount),
        rate,
        price_basis,
        jurisdiction,
    ))
}

/// Parse CSV text and return one input per row, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid.
/// * [`CsvLoadError::InvalidBasis`] / [`CsvLoadError::InvalidJurisdiction`]
///   naming the first offending row.
pub fn load_from_str(
    input: &str,
    default_rate: Decimal,
) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1, default_rate))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    default_rate: Decimal,
) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents, default_rate)
}
