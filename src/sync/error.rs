use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failures surfaced by the sync core. A stale write is not one of them.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Client-supplied item is structurally invalid; nothing was written.
    #[error("invalid item at index {index}: {reason}")]
    Validation { index: usize, reason: String },

    /// Update-only mode and the key has no stored entry; nothing was written.
    #[error("no stored entry for item {item_id} from source {source_id}")]
    NotFoundForUpdate { item_id: String, source_id: String },

    /// Opaque persistence failure; the unit of work was rolled back.
    #[error("store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl SyncError {
    /// True when the caller sent something we refuse, as opposed to a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SyncError::Validation { .. } | SyncError::NotFoundForUpdate { .. }
        )
    }
}
