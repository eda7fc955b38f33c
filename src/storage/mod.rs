// Persistence traits for keyed entries; sea-orm implementation in `sql`

pub mod sql;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{EntryKey, SyncEntry};

pub use sql::SqlStore;

/// Bounds of an ordered, newest-first range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanQuery {
    pub since: Option<DateTime<Utc>>,
    pub offset: u64,
    pub limit: u64,
}

/// Read access plus the entry point for atomic writes.
#[async_trait::async_trait]
pub trait EntryStore<E: SyncEntry>: Send + Sync {
    type Tx: EntryTx<E>;

    /// Open a unit of work. Nothing written through it is visible until `commit`.
    async fn begin(&self) -> anyhow::Result<Self::Tx>;

    /// Entries of one user ordered by datetime descending, then by key ascending.
    async fn scan(&self, user_id: Uuid, query: &ScanQuery) -> anyhow::Result<Vec<E>>;

    /// All keys of one user, ascending.
    async fn keys(&self, user_id: Uuid) -> anyhow::Result<Vec<EntryKey>>;
}

/// A unit of work. Dropping it without `commit` discards every write.
#[async_trait::async_trait]
pub trait EntryTx<E: SyncEntry>: Send + Sized {
    /// Point lookup of one key. The sync core reads in bulk through `get_many`;
    /// this is the single-key form of the same contract.
    async fn get(&self, user_id: Uuid, key: &EntryKey) -> anyhow::Result<Option<E>>;

    /// Stored entries for whichever of `keys` exist, in no particular order.
    async fn get_many(&self, user_id: Uuid, keys: &[EntryKey]) -> anyhow::Result<Vec<E>>;

    async fn keys(&self, user_id: Uuid) -> anyhow::Result<Vec<EntryKey>>;

    async fn insert(&self, user_id: Uuid, entries: &[E]) -> anyhow::Result<()>;

    /// Overwrite the mutable fields of an existing entry.
    async fn update(&self, user_id: Uuid, entry: &E) -> anyhow::Result<()>;

    async fn delete(&self, user_id: Uuid, keys: &[EntryKey]) -> anyhow::Result<u64>;

    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64>;

    async fn commit(self) -> anyhow::Result<()>;
}
