use poem_openapi::payload::PlainText;

use crate::{storage::SqlStore, sync_api::models::HealthResponse};

pub struct HealthService<'a> {
    pub store: &'a SqlStore,
}

impl<'a> HealthService<'a> {
    pub fn new(store: &'a SqlStore) -> Self {
        Self { store }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status(&self) -> HealthResponse {
        match self.store.ping().await {
            Ok(()) => HealthResponse::Ok(PlainText("ok".to_string())),
            Err(e) => {
                tracing::warn!(error = %format!("{:?}", e), "health check failed");
                HealthResponse::Unavailable(PlainText("database unavailable".to_string()))
            }
        }
    }
}
