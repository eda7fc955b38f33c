// Full-state sync: the client declares its whole collection and the server converges

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    domain::models::{EntryKey, IncomingEntry, SyncEntry},
    storage::{EntryStore, EntryTx},
};

use super::{SyncResult, validate::validate_batch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileSummary {
    pub created: u64,
    pub deleted: u64,
}

pub struct FullStateReconciler<'a, S> {
    store: &'a S,
}

impl<'a, S> FullStateReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Converge the stored key set to the client's key set.
    ///
    /// Keys only on the server are deleted, keys only on the client are created.
    /// Keys on both sides are left as stored, whatever their payload.
    #[tracing::instrument(level = "debug", skip(self, items), fields(declared = items.len()))]
    pub async fn reconcile_by_diff<I, E>(
        &self,
        user_id: Uuid,
        items: Vec<I>,
    ) -> SyncResult<ReconcileSummary>
    where
        I: IncomingEntry<Entry = E>,
        E: SyncEntry,
        S: EntryStore<E>,
    {
        let incoming = validate_batch(items)?;
        let client_keys: BTreeSet<EntryKey> = incoming.iter().map(|e| e.key().clone()).collect();

        let tx = self.store.begin().await?;
        let stored_keys: BTreeSet<EntryKey> = tx.keys(user_id).await?.into_iter().collect();

        let to_delete: Vec<EntryKey> = stored_keys.difference(&client_keys).cloned().collect();
        let to_create: Vec<E> = incoming
            .into_iter()
            .filter(|e| !stored_keys.contains(e.key()))
            .collect();

        let deleted = tx.delete(user_id, &to_delete).await?;
        tx.insert(user_id, &to_create).await?;
        tx.commit().await?;

        let summary = ReconcileSummary {
            created: to_create.len() as u64,
            deleted,
        };
        tracing::info!(
            %user_id,
            created = summary.created,
            deleted = summary.deleted,
            "reconciled collection by diff"
        );
        Ok(summary)
    }

    /// Drop everything the user has stored and store exactly `items`.
    ///
    /// Destructive: server-side updates the client never pulled are lost.
    #[tracing::instrument(level = "debug", skip(self, items), fields(declared = items.len()))]
    pub async fn replace_all<I, E>(&self, user_id: Uuid, items: Vec<I>) -> SyncResult<Vec<E>>
    where
        I: IncomingEntry<Entry = E>,
        E: SyncEntry,
        S: EntryStore<E>,
    {
        let incoming = validate_batch(items)?;

        let tx = self.store.begin().await?;
        let removed = tx.delete_all(user_id).await?;
        tx.insert(user_id, &incoming).await?;
        tx.commit().await?;

        tracing::info!(
            %user_id,
            removed,
            created = incoming.len(),
            "replaced collection"
        );
        Ok(incoming)
    }
}
