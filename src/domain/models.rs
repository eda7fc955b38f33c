// Domain models shared by the sync core, the store and the HTTP layer

use chrono::{DateTime, Utc};

/// Identity of an entry inside one user's collection.
///
/// Ordering is by `item_id`, then `source_id`; fingerprints depend on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryKey {
    pub item_id: String,
    pub source_id: String,
}

impl EntryKey {
    pub fn new(item_id: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            source_id: source_id.into(),
        }
    }
}

/// A keyed, timestamped entry kind the sync engine can merge.
pub trait SyncEntry: Clone + Send + Sync + 'static {
    fn key(&self) -> &EntryKey;

    /// Client-supplied logical clock. Only ever compared, never trusted as wall time.
    fn datetime(&self) -> DateTime<Utc>;
}

/// A loosely typed item as submitted by a client, before validation.
pub trait IncomingEntry {
    type Entry: SyncEntry;

    /// Check required fields and build the typed entry. The error is a short reason.
    fn into_entry(self) -> Result<Self::Entry, String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub key: EntryKey,
    pub datetime: DateTime<Utc>,
    pub chapter_id: Option<String>,
    pub chapter_title: Option<String>,
    /// Position marker, usually a page number
    pub page: i64,
}

impl SyncEntry for ProgressRecord {
    fn key(&self) -> &EntryKey {
        &self.key
    }

    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub key: EntryKey,
    pub datetime: DateTime<Utc>,
    pub updates: i64,
    pub latest_chapter: Option<String>,
}

impl SyncEntry for LibraryEntry {
    fn key(&self) -> &EntryKey {
        &self.key
    }

    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
}
