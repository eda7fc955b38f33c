use chrono::{DateTime, Utc};
use poem_openapi::payload::Json;
use uuid::Uuid;

use crate::{
    domain::models::ProgressRecord,
    storage::SqlStore,
    sync::{BatchMerger, CreatePolicy, IncrementalFetcher},
    sync_api::models::{
        ProgressItemDto, ProgressListResponse, ProgressMergeDto,
        ProgressMergeResponse, sync_failure,
    },
};

pub struct ProgressService<'a> {
    pub store: &'a SqlStore,
}

impl<'a> ProgressService<'a> {
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
    ) -> ProgressListResponse {
        let page = IncrementalFetcher::new(self.store)
            .fetch::<ProgressRecord>(user_id, since, offset, limit)
            .await;
        match page {
            Ok(records) => {
                ProgressListResponse::Ok(Json(records.into_iter().map(Into::into).collect()))
            }
            Err(e) => sync_failure(e, "retrieve record items"),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, items), fields(batch = items.len()))]
    pub async fn merge(
        &self,
        user_id: Uuid,
        items: Vec<ProgressItemDto>,
        policy: CreatePolicy,
    ) -> ProgressMergeResponse {
        match BatchMerger::new(self.store).merge(user_id, items, policy).await {
            Ok(outcomes) => ProgressMergeResponse::Ok(Json(ProgressMergeDto {
                message: "Record items processed successfully".to_string(),
                records: outcomes.into_iter().map(Into::into).collect(),
            })),
            Err(e) => sync_failure(e, "record items"),
        }
    }
}

