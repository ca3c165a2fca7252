//! Rolling history of calculations.
//!
//! [`HistoryStore`] owns the bounded, deduplicated list and its persistence;
//! [`HistoryRecorder`] debounces writes into it while input is still changing.

mod recorder;
mod store;

pub use recorder::{DEFAULT_DEBOUNCE, HistoryRecorder};
pub use store::{DEFAULT_HISTORY_KEY, HISTORY_CAPACITY, HistoryStore};
