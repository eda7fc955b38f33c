// Last-writer-wins on the client's logical clock

use crate::domain::models::SyncEntry;

use super::{SyncError, SyncResult};

/// Whether a batch may create entries that are not stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreatePolicy {
    #[default]
    Allow,
    /// Update-only: an unknown key fails the whole call.
    Forbid,
}

/// What happened to one incoming item, carrying the entry now stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome<E> {
    Created(E),
    Updated(E),
    /// Incoming item was not newer; holds the untouched stored entry.
    Kept(E),
}

impl<E> MergeOutcome<E> {
    pub fn into_entry(self) -> E {
        match self {
            MergeOutcome::Created(e) | MergeOutcome::Updated(e) | MergeOutcome::Kept(e) => e,
        }
    }
}

/// Decide the fate of `incoming` against the stored entry with the same key.
///
/// Only a strictly newer `datetime` replaces a stored entry. Equal timestamps
/// keep what is stored, so replays and concurrent duplicates are no-ops.
pub fn resolve<E: SyncEntry>(
    stored: Option<E>,
    incoming: E,
    policy: CreatePolicy,
) -> SyncResult<MergeOutcome<E>> {
    match stored {
        None => match policy {
            CreatePolicy::Allow => Ok(MergeOutcome::Created(incoming)),
            CreatePolicy::Forbid => Err(SyncError::NotFoundForUpdate {
                item_id: incoming.key().item_id.clone(),
                source_id: incoming.key().source_id.clone(),
            }),
        },
        Some(stored) if incoming.datetime() > stored.datetime() => {
            Ok(MergeOutcome::Updated(incoming))
        }
        Some(stored) => Ok(MergeOutcome::Kept(stored)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::sync::fixtures::progress;

    #[test]
    fn absent_entry_is_created() {
        let incoming = progress("7", "2", 100, 3);
        let outcome = resolve(None, incoming.clone(), CreatePolicy::Allow).unwrap();
        assert_eq!(outcome, MergeOutcome::Created(incoming));
    }

    #[test]
    fn absent_entry_in_update_only_mode_is_an_error() {
        let err = resolve(None, progress("7", "2", 100, 3), CreatePolicy::Forbid).unwrap_err();
        match err {
            SyncError::NotFoundForUpdate { item_id, source_id } => {
                assert_eq!(item_id, "7");
                assert_eq!(source_id, "2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn newer_incoming_wins() {
        let stored = progress("7", "2", 100, 3);
        let incoming = progress("7", "2", 200, 9);
        let outcome = resolve(Some(stored), incoming.clone(), CreatePolicy::Forbid).unwrap();
        assert_eq!(outcome, MergeOutcome::Updated(incoming));
    }

    #[test]
    fn older_incoming_is_discarded() {
        let stored = progress("7", "2", 100, 3);
        let outcome = resolve(
            Some(stored.clone()),
            progress("7", "2", 50, 9),
            CreatePolicy::Allow,
        )
        .unwrap();
        assert_eq!(outcome, MergeOutcome::Kept(stored));
    }

    #[test]
    fn equal_timestamp_keeps_stored() {
        let stored = progress("7", "2", 100, 3);
        let outcome = resolve(
            Some(stored.clone()),
            progress("7", "2", 100, 4),
            CreatePolicy::Allow,
        )
        .unwrap();
        assert_eq!(outcome.into_entry().page, 3);
    }

    #[test]
    fn sub_second_differences_count() {
        let stored = progress("7", "2", 1_000, 3);
        let mut incoming = progress("7", "2", 1_000, 4);
        incoming.datetime += Duration::microseconds(1);
        let outcome = resolve(Some(stored), incoming, CreatePolicy::Allow).unwrap();
        match outcome {
            MergeOutcome::Updated(r) => assert_eq!(r.page, 4),
            other => panic!("expected update, got {other:?}"),
        }
    }
}
