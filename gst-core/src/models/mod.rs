mod calculation_input;
mod calculation_result;
mod history_entry;
mod jurisdiction;
mod price_basis;

pub use calculation_input::{CalculationInput, DEFAULT_RATE};
pub use calculation_result::{CalculationResult, TaxSplit};
pub use history_entry::HistoryEntry;
pub use jurisdiction::Jurisdiction;
pub use price_basis::PriceBasis;
