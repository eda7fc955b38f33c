use std::sync::Arc;

use poem_openapi::{OpenApi, param::Query, payload::Json};

use super::{
    auth::UserAuth,
    models::{
        FingerprintResponse, HealthResponse, LibraryItemDto, LibraryListResponse,
        LibraryMergeResponse, ProgressItemDto, ProgressListResponse, ProgressMergeResponse,
        ReconcileResponse, ReplaceResponse,
    },
    services::{
        health::HealthService, library::LibraryService, parse_since, progress::ProgressService,
    },
};
use crate::{storage::SqlStore, sync::CreatePolicy};

pub struct SyncApi {
    pub store: Arc<SqlStore>,
}

#[OpenApi]
impl SyncApi {
    /// Liveness plus a database round trip
    #[oai(path = "/health", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn health(&self) -> HealthResponse {
        HealthService::new(&self.store).status().await
    }

    // ===== Progress records =====

    /// Page of progress records, newest first
    #[oai(path = "/api/records", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth, since, offset, limit))]
    async fn list_records(
        &self,
        auth: UserAuth,
        /// Only records with datetime >= ts (epoch milliseconds)
        #[oai(name = "ts")]
        Query(since): Query<Option<i64>>,
        /// Records to skip
        #[oai(name = "os")]
        Query(offset): Query<Option<u64>>,
        /// Page size, capped at 50
        #[oai(name = "lm")]
        Query(limit): Query<Option<u64>>,
    ) -> ProgressListResponse {
        let since = match parse_since(since) {
            Ok(since) => since,
            Err(resp) => return resp,
        };
        ProgressService::new(&self.store)
            .list(auth.0, since, offset, limit)
            .await
    }

    /// Batch upsert of progress records, last writer wins per key
    #[oai(path = "/api/records", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, auth, body))]
    async fn merge_records(
        &self,
        auth: UserAuth,
        body: Json<Vec<ProgressItemDto>>,
    ) -> ProgressMergeResponse {
        ProgressService::new(&self.store)
            .merge(auth.0, body.0, CreatePolicy::Allow)
            .await
    }

    /// Batch update of existing progress records; unknown keys fail the batch
    #[oai(path = "/api/records", method = "patch")]
    #[tracing::instrument(level = "debug", skip(self, auth, body))]
    async fn update_records(
        &self,
        auth: UserAuth,
        body: Json<Vec<ProgressItemDto>>,
    ) -> ProgressMergeResponse {
        ProgressService::new(&self.store)
            .merge(auth.0, body.0, CreatePolicy::Forbid)
            .await
    }

    // ===== Library entries =====

    /// Page of library entries, newest first
    #[oai(path = "/api/saveds", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth, since, offset, limit))]
    async fn list_saveds(
        &self,
        auth: UserAuth,
        /// Only entries with datetime >= ts (epoch milliseconds)
        #[oai(name = "ts")]
        Query(since): Query<Option<i64>>,
        /// Entries to skip
        #[oai(name = "os")]
        Query(offset): Query<Option<u64>>,
        /// Page size, capped at 50
        #[oai(name = "lm")]
        Query(limit): Query<Option<u64>>,
    ) -> LibraryListResponse {
        let since = match parse_since(since) {
            Ok(since) => since,
            Err(resp) => return resp,
        };
        LibraryService::new(&self.store)
            .list(auth.0, since, offset, limit)
            .await
    }

    /// Batch upsert of library entries, last writer wins per key
    #[oai(path = "/api/saveds", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, auth, body))]
    async fn merge_saveds(
        &self,
        auth: UserAuth,
        body: Json<Vec<LibraryItemDto>>,
    ) -> LibraryMergeResponse {
        LibraryService::new(&self.store)
            .merge(auth.0, body.0, CreatePolicy::Allow)
            .await
    }

    /// Full sync by key-set diff: creates missing keys, deletes undeclared ones
    #[oai(path = "/api/saveds", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, auth, body))]
    async fn reconcile_saveds(
        &self,
        auth: UserAuth,
        body: Json<Vec<LibraryItemDto>>,
    ) -> ReconcileResponse {
        LibraryService::new(&self.store)
            .reconcile(auth.0, body.0)
            .await
    }

    /// Full sync by wholesale replacement. Destructive.
    #[oai(path = "/api/saveds/replace", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, auth, body))]
    async fn replace_saveds(
        &self,
        auth: UserAuth,
        body: Json<Vec<LibraryItemDto>>,
    ) -> ReplaceResponse {
        LibraryService::new(&self.store)
            .replace(auth.0, body.0)
            .await
    }

    /// Digest of the stored key set, for drift detection
    #[oai(path = "/api/saveds/hash", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth))]
    async fn saveds_hash(&self, auth: UserAuth) -> FingerprintResponse {
        LibraryService::new(&self.store).fingerprint(auth.0).await
    }
}
