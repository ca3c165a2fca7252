use std::path::Path;
use std::sync::Arc;

use gst_core::calculations::{PriceCategory, PriceProjector, ProjectionError};
use gst_core::input::{parse_amount, parse_rate};
use gst_core::store::{KeyValueStore, MemoryStore, MemoryStoreFactory, StoreRegistry};
use gst_core::{
    CalculationInput, HistoryEntry, HistoryStore, Jurisdiction, PriceBasis, TaxEngine,
};
use gst_store_sqlite::SqliteStoreFactory;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::csv_loader::{self, CsvLoadError};
use crate::render;

/// Registry with every store backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

/// Opens the configured history.
///
/// When the store cannot be opened the calculator still works: history is
/// kept in memory for this run and the failure is logged.
pub async fn open_history(config: &AppConfig) -> Arc<HistoryStore> {
    let store_config = config.store_config();
    debug!(backend = %store_config.backend, "opening history store");

    let backend: Arc<dyn KeyValueStore> = match build_registry().create(&store_config).await {
        Ok(store) => Arc::from(store),
        Err(error) => {
            warn!(
                backend = %store_config.backend,
                %error,
                "history store unavailable, keeping history in memory"
            );
            Arc::new(MemoryStore::new())
        }
    };

    Arc::new(HistoryStore::open(backend, config.history.key.clone()).await)
}

/// Builds an input from command-line text. A missing rate uses the
/// configured default.
pub fn input_from_args(
    amount: &str,
    rate: Option<&str>,
    inclusive: bool,
    inter_state: bool,
    default_rate: Decimal,
) -> CalculationInput {
    let price_basis = if inclusive {
        PriceBasis::Inclusive
    } else {
        PriceBasis::Exclusive
    };
    let jurisdiction = if inter_state {
        Jurisdiction::InterState
    } else {
        Jurisdiction::IntraState
    };

    CalculationInput::new(
        parse_amount(amount),
        rate.map_or(default_rate, parse_rate),
        price_basis,
        jurisdiction,
    )
}

/// Computes `input` and renders it; with `record`, the result goes straight
/// into history.
pub async fn calculate(
    history: &HistoryStore,
    input: &CalculationInput,
    record: bool,
) -> String {
    let result = TaxEngine::new().compute(input);
    if record {
        history
            .record(HistoryEntry::from_calculation(input, &result))
            .await;
    }
    render::render_breakdown(input, &result)
}

pub fn predict(
    amount: &str,
    category: PriceCategory,
    years: u32,
) -> Result<String, ProjectionError> {
    let projection = PriceProjector::new().project(parse_amount(amount), category, years)?;
    Ok(render::render_projection(category, years, &projection))
}

/// Computes every row of a CSV file, one rendered line per row.
pub fn batch(
    path: &Path,
    default_rate: Decimal,
) -> Result<String, CsvLoadError> {
    let inputs = csv_loader::load_from_file(path, default_rate)?;
    debug!(path = %path.display(), rows = inputs.len(), "batch loaded");

    let engine = TaxEngine::new();
    let lines = inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| render::render_batch_row(idx + 1, input, &engine.compute(input)))
        .collect::<Vec<_>>();
    Ok(lines.join("\n") + "\n")
}
