pub mod calculations;
pub mod format;
pub mod history;
pub mod input;
pub mod models;
pub mod store;

pub use calculations::{TaxEngine, compute};
pub use history::{HISTORY_CAPACITY, HistoryRecorder, HistoryStore};
pub use models::*;
pub use store::{KeyValueStore, StoreError};
