use chrono::{DateTime, Utc};
use poem_openapi::payload::Json;
use uuid::Uuid;

use crate::{
    domain::models::LibraryEntry,
    storage::SqlStore,
    sync::{BatchMerger, CreatePolicy, FullStateReconciler, IncrementalFetcher, IntegrityHasher},
    sync_api::models::{
        FingerprintDto, FingerprintResponse, LibraryItemDto, LibraryListResponse,
        LibraryMergeDto, LibraryMergeResponse, LibraryReplaceDto, ReconcileResponse,
        ReplaceResponse, sync_failure,
    },
};

pub struct LibraryService<'a> {
    pub store: &'a SqlStore,
}

impl<'a> LibraryService<'a> {
    pub fn new(store: &'a SqlStore) -> Self {
        Self { store }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> LibraryListResponse {
        let page = IncrementalFetcher::new(self.store)
            .fetch::<LibraryEntry>(user_id, since, offset, limit)
            .await;
        match page {
            Ok(entries) => {
                LibraryListResponse::Ok(Json(entries.into_iter().map(Into::into).collect()))
            }
            Err(e) => sync_failure(e, "retrieve saved items"),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, items), fields(batch = items.len()))]
    pub async fn merge(
        &self,
        user_id: Uuid,
        items: Vec<LibraryItemDto>,
        policy: CreatePolicy,
    ) -> LibraryMergeResponse {
        match BatchMerger::new(self.store).merge(user_id, items, policy).await {
            Ok(outcomes) => LibraryMergeResponse::Ok(Json(LibraryMergeDto {
                message: "Saved items processed successfully".to_string(),
                saveds: outcomes.into_iter().map(Into::into).collect(),
            })),
            Err(e) => sync_failure(e, "save items"),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, items), fields(declared = items.len()))]
    pub async fn reconcile(&self, user_id: Uuid, items: Vec<LibraryItemDto>) -> ReconcileResponse {
        match FullStateReconciler::new(self.store)
            .reconcile_by_diff(user_id, items)
            .await
        {
            Ok(summary) => ReconcileResponse::Ok(Json(summary.into())),
            Err(e) => sync_failure(e, "reconcile saved items"),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, items), fields(declared = items.len()))]
    pub async fn replace(&self, user_id: Uuid, items: Vec<LibraryItemDto>) -> ReplaceResponse {
        match FullStateReconciler::new(self.store)
            .replace_all(user_id, items)
            .await
        {
            Ok(entries) => ReplaceResponse::Ok(Json(LibraryReplaceDto {
                message: "Saved items replaced successfully".to_string(),
                saveds: entries.into_iter().map(Into::into).collect(),
            })),
            Err(e) => sync_failure(e, "replace saved items"),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fingerprint(&self, user_id: Uuid) -> FingerprintResponse {
        match IntegrityHasher::new(self.store)
            .fingerprint::<LibraryEntry>(user_id)
            .await
        {
            Ok(hash) => FingerprintResponse::Ok(Json(FingerprintDto { hash })),
            Err(e) => sync_failure(e, "compute saved items hash"),
        }
    }
}
