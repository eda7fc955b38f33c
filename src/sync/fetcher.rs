// Incremental pulls, newest first

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::{
    domain::{mapping::STORABLE_YEARS, models::SyncEntry},
    storage::{EntryStore, ScanQuery},
};

use super::SyncResult;

/// Hard cap on the size of any page, whatever the client asks for.
pub const PAGE_SIZE_CAP: u64 = 50;

/// Missing limit means a full page; anything else is clamped to [1, cap].
pub fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.map_or(PAGE_SIZE_CAP, |l| l.clamp(1, PAGE_SIZE_CAP))
}

/// SQL offsets are signed 64-bit; anything past that skips every row anyway.
pub fn clamp_offset(offset: Option<u64>) -> u64 {
    offset.unwrap_or(0).min(i64::MAX as u64)
}

pub struct IncrementalFetcher<'a, S> {
    store: &'a S,
}

impl<'a, S> IncrementalFetcher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// One page of entries with `datetime >= since`, newest first.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch<E>(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> SyncResult<Vec<E>>
    where
        E: SyncEntry,
        S: EntryStore<E>,
    {
        // Stored datetimes all fall inside STORABLE_YEARS
        let since = match since {
            Some(s) if s.year() > *STORABLE_YEARS.end() => return Ok(Vec::new()),
            Some(s) if s.year() < *STORABLE_YEARS.start() => None,
            since => since,
        };
        let query = ScanQuery {
            since,
            offset: clamp_offset(offset),
            limit: clamp_limit(limit),
        };
        let page = self.store.scan(user_id, &query).await?;
        tracing::debug!(%user_id, returned = page.len(), "served page");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::models::{LibraryEntry, ProgressRecord},
        storage::sql::testing::temp_store,
        sync::{
            BatchMerger, CreatePolicy,
            fixtures::{progress, saved},
        },
    };

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None), 50);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(20)), 20);
        assert_eq!(clamp_limit(Some(1000)), 50);
    }

    #[test]
    fn offsets_fit_a_signed_column() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(7)), 7);
        assert_eq!(clamp_offset(Some(u64::MAX)), i64::MAX as u64);
    }

    #[tokio::test]
    async fn huge_offset_yields_empty_page() {
        let (_dir, store) = temp_store().await;
        let user = Uuid::new_v4();
        BatchMerger::new(&store)
            .merge(user, vec![saved("1", "s", 10, 0)], CreatePolicy::Allow)
            .await
            .unwrap();

        let page: Vec<LibraryEntry> = IncrementalFetcher::new(&store)
            .fetch(user, None, Some(u64::MAX), None)
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn since_outside_storable_years() {
        let (_dir, store) = temp_store().await;
        let user = Uuid::new_v4();
        BatchMerger::new(&store)
            .merge(
                user,
                vec![saved("1", "s", 10, 0), saved("2", "s", 253_402_300_799_999, 0)],
                CreatePolicy::Allow,
            )
            .await
            .unwrap();
        let fetcher = IncrementalFetcher::new(&store);

        // 10000-01-01T00:00:00Z
        let future = DateTime::from_timestamp_millis(253_402_300_800_000);
        let page: Vec<LibraryEntry> = fetcher.fetch(user, future, None, None).await.unwrap();
        assert!(page.is_empty());

        // year -1
        let past = DateTime::from_timestamp_millis(-62_167_219_200_001);
        let page: Vec<LibraryEntry> = fetcher.fetch(user, past, None, None).await.unwrap();
        let items: Vec<&str> = page.iter().map(|e| e.key.item_id.as_str()).collect();
        assert_eq!(items, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn page_size_never_exceeds_cap() {
        let (_dir, store) = temp_store().await;
        let user = Uuid::new_v4();
        let batch: Vec<LibraryEntry> = (0..60)
            .map(|i| saved(&format!("{i:02}"), "s", i, 0))
            .collect();
        BatchMerger::new(&store)
            .merge(user, batch, CreatePolicy::Allow)
            .await
            .unwrap();

        let fetcher = IncrementalFetcher::new(&store);
        let page: Vec<LibraryEntry> = fetcher.fetch(user, None, None, Some(1000)).await.unwrap();
        assert_eq!(page.len(), 50);
        assert_eq!(page[0].key.item_id, "59");

        let rest: Vec<LibraryEntry> = fetcher.fetch(user, None, Some(50), Some(1000)).await.unwrap();
        assert_eq!(rest.len(), 10);
        assert_eq!(rest[9].key.item_id, "00");
    }

    #[tokio::test]
    async fn since_is_inclusive() {
        let (_dir, store) = temp_store().await;
        let user = Uuid::new_v4();
        BatchMerger::new(&store)
            .merge(
                user,
                vec![
                    progress("old", "s", 100, 1),
                    progress("edge", "s", 200, 2),
                    progress("new", "s", 300, 3),
                ],
                CreatePolicy::Allow,
            )
            .await
            .unwrap();

        let since = DateTime::from_timestamp_millis(200);
        let page: Vec<ProgressRecord> = IncrementalFetcher::new(&store)
            .fetch(user, since, None, None)
            .await
            .unwrap();
        let items: Vec<&str> = page.iter().map(|r| r.key.item_id.as_str()).collect();
        assert_eq!(items, vec!["new", "edge"]);
    }

    #[tokio::test]
    async fn empty_collection_yields_empty_page() {
        let (_dir, store) = temp_store().await;
        let page: Vec<ProgressRecord> = IncrementalFetcher::new(&store)
            .fetch(Uuid::new_v4(), None, Some(10), Some(5))
            .await
            .unwrap();
        assert!(page.is_empty());
    }
}
