use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::HistoryEntry;
use crate::store::KeyValueStore;

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 10;

/// Key the history is persisted under unless configured otherwise.
pub const DEFAULT_HISTORY_KEY: &str = "gst_history";

/// Bounded log of past calculations, persisted as one JSON array.
///
/// Entries are held oldest first. Persistence is best-effort: read failures
/// yield an empty history and write failures are logged, never returned.
pub struct HistoryStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryStore {
    /// Loads the history persisted under `key`.
    ///
    /// A missing key, an unreadable value or corrupt JSON all give an empty
    /// history. A persisted list longer than [`HISTORY_CAPACITY`] keeps only
    /// its newest entries.
    pub async fn open(
        backend: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let entries = Self::load(backend.as_ref(), &key).await;
        debug!(key = %key, count = entries.len(), "history loaded");

        Self {
            backend,
            key,
            entries: Mutex::new(entries),
        }
    }

    async fn load(
        backend: &dyn KeyValueStore,
        key: &str,
    ) -> Vec<HistoryEntry> {
        let bytes = match backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!(key, %error, "history unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<HistoryEntry>>(&bytes) {
            Ok(mut entries) => {
                let excess = entries.len().saturating_sub(HISTORY_CAPACITY);
                entries.drain(..excess);
                entries
            }
            Err(error) => {
                warn!(key, %error, "history corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Records a calculation.
    ///
    /// Returns `false` without changing anything when `amount <= 0` or when
    /// the entry is identical to the newest one. Otherwise the entry is
    /// appended, the oldest entry is evicted past [`HISTORY_CAPACITY`], and
    /// the whole list is persisted.
    pub async fn append(
        &self,
        amount: Decimal,
        rate: Decimal,
        total: Decimal,
        label: impl Into<String>,
    ) -> bool {
        self.record(HistoryEntry::new(amount, rate, total, label))
            .await
    }

    /// [`append`](Self::append) for an already built entry.
    pub async fn record(
        &self,
        entry: HistoryEntry,
    ) -> bool {
        if entry.amount <= Decimal::ZERO {
            return false;
        }

        let mut entries = self.entries.lock().await;
        if entries.last() == Some(&entry) {
            debug!(label = %entry.label, "duplicate history entry skipped");
            return false;
        }

        info!(amount = %entry.amount, rate = %entry.rate, label = %entry.label, "history entry recorded");
        entries.push(entry);
        if entries.len() > HISTORY_CAPACITY {
            entries.remove(0);
        }

        self.persist(&entries).await;
        true
    }

    /// Removes every entry and the persisted key.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();

        if let Err(error) = self.backend.remove(&self.key).await {
            warn!(key = %self.key, %error, "failed to remove persisted history");
        }
        info!("history cleared");
    }

    /// Entries newest first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.iter().rev().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn persist(
        &self,
        entries: &[HistoryEntry],
    ) {
        let bytes = match serde_json::to_vec(entries) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "failed to encode history");
                return;
            }
        };

        if let Err(error) = self.backend.set(&self.key, &bytes).await {
            warn!(key = %self.key, %error, "failed to persist history");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::store::{MemoryStore, StoreError};

    const KEY: &str = "gst_history";

    /// A store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::Backend("disk on fire".to_string()))
        }
        async fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk on fire".to_string()))
        }
        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk on fire".to_string()))
        }
    }

    fn entry(amount: i64) -> HistoryEntry {
        let amount = Decimal::from(amount);
        HistoryEntry::new(amount, dec!(18), amount * dec!(1.18), "Excl. Intra")
    }

    async fn open_empty() -> (Arc<MemoryStore>, HistoryStore) {
        let backend = Arc::new(MemoryStore::new());
        let history = HistoryStore::open(backend.clone(), KEY).await;
        (backend, history)
    }

    async fn persisted(backend: &MemoryStore) -> Vec<HistoryEntry> {
        let bytes = backend.get(KEY).await.unwrap().expect("history persisted");
        serde_json::from_slice(&bytes).unwrap()
    }

    // =========================================================================
    // append
    // =========================================================================

    #[tokio::test]
    async fn append_records_and_persists() {
        let (backend, history) = open_empty().await;

        let recorded = history
            .append(dec!(1000), dec!(18), dec!(1180), "Excl. Intra")
            .await;

        assert!(recorded);
        assert_eq!(history.len().await, 1);
        assert_eq!(persisted(&backend).await, vec![entry(1000)]);
    }

    #[tokio::test]
    async fn append_zero_amount_is_noop() {
        let (backend, history) = open_empty().await;

        assert!(!history.append(Decimal::ZERO, dec!(28), dec!(0), "Incl. Inter").await);
        assert!(!history.append(dec!(-10), dec!(5), dec!(-10.5), "Excl. Intra").await);

        assert!(history.is_empty().await);
        assert!(!backend.contains_key(KEY).await);
    }

    #[tokio::test]
    async fn duplicate_of_newest_entry_is_skipped() {
        let (_, history) = open_empty().await;

        assert!(history.record(entry(500)).await);
        assert!(!history.record(entry(500)).await);

        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_of_older_entry_is_recorded() {
        let (_, history) = open_empty().await;

        history.record(entry(500)).await;
        history.record(entry(600)).await;
        assert!(history.record(entry(500)).await);

        assert_eq!(history.len().await, 3);
    }

    #[tokio::test]
    async fn entries_differing_only_in_label_are_distinct() {
        let (_, history) = open_empty().await;

        history
            .append(dec!(100), dec!(5), dec!(105), "Excl. Intra")
            .await;
        let recorded = history
            .append(dec!(100), dec!(5), dec!(105), "Excl. Inter")
            .await;

        assert!(recorded);
    }

    #[tokio::test]
    async fn eleventh_append_evicts_the_oldest() {
        let (backend, history) = open_empty().await;

        for amount in 1..=11 {
            history.record(entry(amount)).await;
        }

        let stored = persisted(&backend).await;
        assert_eq!(history.len().await, HISTORY_CAPACITY);
        assert_eq!(stored.len(), HISTORY_CAPACITY);
        assert_eq!(stored.first(), Some(&entry(2)));
        assert_eq!(stored.last(), Some(&entry(11)));
    }

    // =========================================================================
    // list / clear
    // =========================================================================

    #[tokio::test]
    async fn list_is_newest_first() {
        let (_, history) = open_empty().await;

        for amount in [10, 20, 30] {
            history.record(entry(amount)).await;
        }

        assert_eq!(history.list().await, vec![entry(30), entry(20), entry(10)]);
    }

    #[tokio::test]
    async fn clear_empties_and_removes_persisted_key() {
        let (backend, history) = open_empty().await;
        history.record(entry(10)).await;

        history.clear().await;

        assert!(history.is_empty().await);
        assert!(!backend.contains_key(KEY).await);
    }

    // =========================================================================
    // loading
    // =========================================================================

    #[tokio::test]
    async fn open_restores_persisted_entries() {
        let (backend, history) = open_empty().await;
        history.record(entry(10)).await;
        history.record(entry(20)).await;

        let reopened = HistoryStore::open(backend, KEY).await;

        assert_eq!(reopened.list().await, vec![entry(20), entry(10)]);
    }

    #[tokio::test]
    async fn open_reads_numeric_json_layout() {
        let json = r#"[{"amount":1180,"rate":18,"total":1180,"type":"Incl. Inter"}]"#;
        let backend = Arc::new(MemoryStore::with_entry(KEY, json));

        let history = HistoryStore::open(backend, KEY).await;

        assert_eq!(
            history.list().await,
            vec![HistoryEntry::new(dec!(1180), dec!(18), dec!(1180), "Incl. Inter")]
        );
    }

    #[tokio::test]
    async fn corrupt_history_opens_empty() {
        let backend = Arc::new(MemoryStore::with_entry(KEY, "{not json"));

        let history = HistoryStore::open(backend, KEY).await;

        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn oversized_history_keeps_newest_entries() {
        let entries: Vec<_> = (1..=13).map(entry).collect();
        let backend = Arc::new(MemoryStore::with_entry(
            KEY,
            serde_json::to_vec(&entries).unwrap(),
        ));

        let history = HistoryStore::open(backend, KEY).await;

        let listed = history.list().await;
        assert_eq!(listed.len(), HISTORY_CAPACITY);
        assert_eq!(listed.first(), Some(&entry(13)));
        assert_eq!(listed.last(), Some(&entry(4)));
    }

    // =========================================================================
    // failing backend
    // =========================================================================

    #[tokio::test]
    async fn unreadable_backend_opens_empty() {
        let history = HistoryStore::open(Arc::new(BrokenStore), KEY).await;

        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn write_failures_do_not_lose_in_memory_entries() {
        let history = HistoryStore::open(Arc::new(BrokenStore), KEY).await;

        assert!(history.record(entry(42)).await);
        history.record(entry(43)).await;

        assert_eq!(history.len().await, 2);

        history.clear().await;
        assert!(history.is_empty().await);
    }
}
