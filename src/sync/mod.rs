//! The synchronization core: conflict resolution, batch merge, full-state
//! reconciliation, incremental pulls and key-set fingerprints.
//!
//! Everything here is generic over the entry kind and the store, so progress
//! records and library entries share one set of rules.

pub mod error;
pub mod fetcher;
pub mod fingerprint;
pub mod merger;
pub mod reconciler;
pub mod resolver;
pub mod validate;

pub use error::{SyncError, SyncResult};
pub use fetcher::IncrementalFetcher;
pub use fingerprint::IntegrityHasher;
pub use merger::BatchMerger;
pub use reconciler::{FullStateReconciler, ReconcileSummary};
pub use resolver::{CreatePolicy, MergeOutcome};

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::DateTime;
    use uuid::Uuid;

    use crate::{
        domain::models::{EntryKey, IncomingEntry, LibraryEntry, ProgressRecord, SyncEntry},
        storage::{
            EntryStore, EntryTx, ScanQuery,
            sql::{SqlStore, SqlTx},
        },
    };

    // Already-typed entries are valid by construction
    impl IncomingEntry for ProgressRecord {
        type Entry = ProgressRecord;

        fn into_entry(self) -> Result<ProgressRecord, String> {
            Ok(self)
        }
    }

    impl IncomingEntry for LibraryEntry {
        type Entry = LibraryEntry;

        fn into_entry(self) -> Result<LibraryEntry, String> {
            Ok(self)
        }
    }

    pub(crate) fn progress(item: &str, source: &str, ms: i64, page: i64) -> ProgressRecord {
        ProgressRecord {
            key: EntryKey::new(item, source),
            datetime: DateTime::from_timestamp_millis(ms).unwrap(),
            chapter_id: Some(format!("c{page}")),
            chapter_title: Some(format!("Chapter {page}")),
            page,
        }
    }

    pub(crate) fn saved(item: &str, source: &str, ms: i64, updates: i64) -> LibraryEntry {
        LibraryEntry {
            key: EntryKey::new(item, source),
            datetime: DateTime::from_timestamp_millis(ms).unwrap(),
            updates,
            latest_chapter: None,
        }
    }

    /// SQLite store whose inserts write their rows and then report a failure.
    pub(crate) struct FailingInsertStore<'a>(pub(crate) &'a SqlStore);

    pub(crate) struct FailingInsertTx(SqlTx);

    #[async_trait::async_trait]
    impl<'a, E> EntryStore<E> for FailingInsertStore<'a>
    where
        E: SyncEntry,
        SqlStore: EntryStore<E, Tx = SqlTx>,
        SqlTx: EntryTx<E>,
    {
        type Tx = FailingInsertTx;

        async fn begin(&self) -> anyhow::Result<FailingInsertTx> {
            Ok(FailingInsertTx(EntryStore::<E>::begin(self.0).await?))
        }

        async fn scan(&self, user_id: Uuid, query: &ScanQuery) -> anyhow::Result<Vec<E>> {
            EntryStore::<E>::scan(self.0, user_id, query).await
        }

        async fn keys(&self, user_id: Uuid) -> anyhow::Result<Vec<EntryKey>> {
            EntryStore::<E>::keys(self.0, user_id).await
        }
    }

    #[async_trait::async_trait]
    impl<E> EntryTx<E> for FailingInsertTx
    where
        E: SyncEntry,
        SqlTx: EntryTx<E>,
    {
        async fn get(&self, user_id: Uuid, key: &EntryKey) -> anyhow::Result<Option<E>> {
            EntryTx::<E>::get(&self.0, user_id, key).await
        }

        async fn get_many(&self, user_id: Uuid, keys: &[EntryKey]) -> anyhow::Result<Vec<E>> {
            EntryTx::<E>::get_many(&self.0, user_id, keys).await
        }

        async fn keys(&self, user_id: Uuid) -> anyhow::Result<Vec<EntryKey>> {
            EntryTx::<E>::keys(&self.0, user_id).await
        }

        async fn insert(&self, user_id: Uuid, entries: &[E]) -> anyhow::Result<()> {
            EntryTx::<E>::insert(&self.0, user_id, entries).await?;
            anyhow::bail!("disk full after inserting {} rows", entries.len())
        }

        async fn update(&self, user_id: Uuid, entry: &E) -> anyhow::Result<()> {
            EntryTx::<E>::update(&self.0, user_id, entry).await
        }

        async fn delete(&self, user_id: Uuid, keys: &[EntryKey]) -> anyhow::Result<u64> {
            EntryTx::<E>::delete(&self.0, user_id, keys).await
        }

        async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
            EntryTx::<E>::delete_all(&self.0, user_id).await
        }

        async fn commit(self) -> anyhow::Result<()> {
            EntryTx::<E>::commit(self.0).await
        }
    }
}
