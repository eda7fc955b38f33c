// Batch upsert: validate, bulk prefetch, classify, apply in one unit of work

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    domain::models::{EntryKey, IncomingEntry, SyncEntry},
    storage::{EntryStore, EntryTx},
};

use super::{
    SyncResult,
    resolver::{CreatePolicy, MergeOutcome, resolve},
    validate::validate_batch,
};

pub struct BatchMerger<'a, S> {
    store: &'a S,
}

impl<'a, S> BatchMerger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Merge `items` into the user's collection.
    ///
    /// Returns one outcome per input item, in input order. Either every create
    /// and update of the batch is committed or none is.
    #[tracing::instrument(level = "debug", skip(self, items), fields(batch = items.len()))]
    pub async fn merge<I, E>(
        &self,
        user_id: Uuid,
        items: Vec<I>,
        policy: CreatePolicy,
    ) -> SyncResult<Vec<MergeOutcome<E>>>
    where
        I: IncomingEntry<Entry = E>,
        E: SyncEntry,
        S: EntryStore<E>,
    {
        let incoming = validate_batch(items)?;
        if incoming.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<EntryKey> = incoming.iter().map(|e| e.key().clone()).collect();

        let tx = self.store.begin().await?;
        let mut stored: HashMap<EntryKey, E> = tx
            .get_many(user_id, &keys)
            .await?
            .into_iter()
            .map(|e| (e.key().clone(), e))
            .collect();

        let outcomes = incoming
            .into_iter()
            .map(|entry| {
                let current = stored.remove(entry.key());
                resolve(current, entry, policy)
            })
            .collect::<SyncResult<Vec<_>>>()?;

        let mut creates = Vec::new();
        let mut updated = 0usize;
        for outcome in &outcomes {
            match outcome {
                MergeOutcome::Created(e) => creates.push(e.clone()),
                MergeOutcome::Updated(e) => {
                    tx.update(user_id, e).await?;
                    updated += 1;
                }
                MergeOutcome::Kept(_) => {}
            }
        }
        tx.insert(user_id, &creates).await?;
        tx.commit().await?;

        tracing::info!(
            %user_id,
            created = creates.len(),
            updated,
            kept = outcomes.len() - creates.len() - updated,
            "merged batch"
        );
        Ok(outcomes)
    }
}
