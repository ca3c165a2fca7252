use std::collections::HashMap;

use async_trait::async_trait;

use super::repository::{KeyValueStore, StoreError};

/// Which store to open and how to reach it.
///
/// `connection_string` means whatever the chosen backend says it means: a
/// database path for `sqlite` (`gst.db`, `:memory:`), nothing for `memory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "gst.db".to_string(),
        }
    }
}

/// Opens a [`KeyValueStore`] for one backend.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Name users select the backend by, e.g. `"sqlite"`.
    fn backend_name(&self) -> &'static str;

    async fn create(&self, config: &StoreConfig) -> Result<Box<dyn KeyValueStore>, StoreError>;
}

/// Backends known to the binary, looked up by name.
#[derive(Default)]
pub struct StoreRegistry {
    factories: HashMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`. A later factory with the same name wins.
    pub fn register(&mut self, factory: Box<dyn StoreFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the store named by `config.backend`.
    ///
    /// An unregistered name is a [`StoreError::Configuration`] listing what
    /// is registered; factory failures are returned as they are.
    pub async fn create(&self, config: &StoreConfig) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(StoreError::Configuration(format!(
                "no store backend named '{}' (registered: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        factory.create(config).await
    }
}
