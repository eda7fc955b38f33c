// Key-set digest for cheap drift detection

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    domain::models::{EntryKey, SyncEntry},
    storage::EntryStore,
};

use super::SyncResult;

/// Joins item id and source id inside one key.
pub const KEY_SEPARATOR: char = '|';
/// Joins consecutive keys.
pub const ENTRY_SEPARATOR: char = ',';

/// SHA-256 (lowercase hex) of `item|source` pairs sorted ascending and joined by `,`.
///
/// Clients compute the same string over their local keys and compare.
pub fn digest_keys(mut keys: Vec<EntryKey>) -> String {
    keys.sort();
    let mut material = String::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            material.push(ENTRY_SEPARATOR);
        }
        material.push_str(&key.item_id);
        material.push(KEY_SEPARATOR);
        material.push_str(&key.source_id);
    }
    hex::encode(Sha256::digest(material.as_bytes()))
}

pub struct IntegrityHasher<'a, S> {
    store: &'a S,
}

impl<'a, S> IntegrityHasher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Digest of the user's current key set. Payload fields never affect it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fingerprint<E>(&self, user_id: Uuid) -> SyncResult<String>
    where
        E: SyncEntry,
        S: EntryStore<E>,
    {
        let keys = self.store.keys(user_id).await?;
        let count = keys.len();
        let digest = digest_keys(keys);
        tracing::debug!(%user_id, keys = count, %digest, "computed fingerprint");
        Ok(digest)
    }
}
