use async_trait::async_trait;

use gst_core::store::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::repository::SqliteStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`gst_core::store::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use gst_core::store::StoreRegistry;
/// use gst_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and run
    /// migrations.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"gst.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"`, an ephemeral in-memory database (useful for tests).
    async fn create(&self, config: &StoreConfig) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = SqliteStore::new(&config.connection_string)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Backend(format!("{e:#}")))?;
        Ok(Box::new(store))
    }
}
