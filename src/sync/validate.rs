// All-or-nothing validation of a client batch

use std::collections::HashSet;

use crate::domain::models::{IncomingEntry, SyncEntry};

use super::{SyncError, SyncResult};

/// Turn every item into a typed entry, or fail on the first bad one.
///
/// A key repeated within the batch is rejected at its second occurrence.
pub fn validate_batch<I: IncomingEntry>(items: Vec<I>) -> SyncResult<Vec<I::Entry>> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let entry = item
            .into_entry()
            .map_err(|reason| SyncError::Validation { index, reason })?;
        if !seen.insert(entry.key().clone()) {
            return Err(SyncError::Validation {
                index,
                reason: format!(
                    "duplicate key mangaId={} pluginId={}",
                    entry.key().item_id,
                    entry.key().source_id
                ),
            });
        }
        entries.push(entry);
    }
    Ok(entries)
}
