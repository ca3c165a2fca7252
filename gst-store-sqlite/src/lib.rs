//! SQLite backend for the GST calculator's key-value store.

pub mod factory;
pub mod repository;

pub use factory::SqliteStoreFactory;
pub use repository::SqliteStore;
