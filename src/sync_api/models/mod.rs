pub mod library;
pub mod progress;
pub use library::*;
pub use progress::*;

use poem::http::StatusCode;
use poem_openapi::{ApiResponse, Enum, Object, payload::{Json, PlainText}};

use crate::sync::{MergeOutcome, SyncError};

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub error: String,
}

impl From<String> for ErrorDto {
    fn from(error: String) -> Self {
        ErrorDto { error }
    }
}

impl From<&str> for ErrorDto {
    fn from(error: &str) -> Self {
        ErrorDto {
            error: error.to_string(),
        }
    }
}

/// Error variants shared by every sync response.
pub trait ErrorReply: Sized {
    fn bad_request(body: ErrorDto) -> Self;
    fn unauthorized(body: ErrorDto) -> Self;
    fn internal(body: ErrorDto) -> Self;

    /// Only update-only merges can miss a key; elsewhere this is a bad request.
    fn not_found(body: ErrorDto) -> Self {
        Self::bad_request(body)
    }
}

/// Maps request extraction failures (identity, query, body) onto the `{error}` shape.
pub fn reject<T: ErrorReply>(err: poem::Error) -> T {
    if err.status() == StatusCode::UNAUTHORIZED {
        T::unauthorized("Unauthorized".into())
    } else {
        T::bad_request(err.to_string().into())
    }
}

/// Maps a core failure onto a response. Store details only go to the log.
pub fn sync_failure<T: ErrorReply>(err: SyncError, action: &str) -> T {
    if err.is_client_error() {
        tracing::debug!(error = %err, action, "rejected request");
    }
    match err {
        SyncError::Validation { .. } => T::bad_request(err.to_string().into()),
        SyncError::NotFoundForUpdate { .. } => T::not_found(err.to_string().into()),
        SyncError::Store(e) => {
            tracing::error!(error = %format!("{:?}", e), action, "store failure");
            T::internal(format!("Failed to {action}").into())
        }
    }
}

macro_rules! error_reply {
    ($ty:ident) => {
        impl ErrorReply for $ty {
            fn bad_request(body: ErrorDto) -> Self {
                $ty::BadRequest(Json(body))
            }
            fn unauthorized(body: ErrorDto) -> Self {
                $ty::Unauthorized(Json(body))
            }
            fn internal(body: ErrorDto) -> Self {
                $ty::InternalError(Json(body))
            }
        }
    };
    ($ty:ident, not_found) => {
        impl ErrorReply for $ty {
            fn bad_request(body: ErrorDto) -> Self {
                $ty::BadRequest(Json(body))
            }
            fn unauthorized(body: ErrorDto) -> Self {
                $ty::Unauthorized(Json(body))
            }
            fn internal(body: ErrorDto) -> Self {
                $ty::InternalError(Json(body))
            }
            fn not_found(body: ErrorDto) -> Self {
                $ty::NotFound(Json(body))
            }
        }
    };
}

/// How one submitted item was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "lowercase")]
pub enum MergeStatusDto {
    Created,
    Updated,
    Kept,
}

impl<E> From<&MergeOutcome<E>> for MergeStatusDto {
    fn from(outcome: &MergeOutcome<E>) -> Self {
        match outcome {
            MergeOutcome::Created(_) => MergeStatusDto::Created,
            MergeOutcome::Updated(_) => MergeStatusDto::Updated,
            MergeOutcome::Kept(_) => MergeStatusDto::Kept,
        }
    }
}

// ===== Progress records =====

#[derive(ApiResponse)]
#[oai(bad_request_handler = "reject")]
pub enum ProgressListResponse {
    /// Newest-first page of progress records
    #[oai(status = 200)]
    Ok(Json<Vec<ProgressRecordDto>>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
error_reply!(ProgressListResponse);

#[derive(ApiResponse)]
#[oai(bad_request_handler = "reject")]
pub enum ProgressMergeResponse {
    /// One result per submitted item
    #[oai(status = 200)]
    Ok(Json<ProgressMergeDto>),

    /// Malformed body or invalid item; nothing was written
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Update-only merge referenced an unknown key; nothing was written
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
error_reply!(ProgressMergeResponse, not_found);

// ===== Library entries =====

#[derive(ApiResponse)]
#[oai(bad_request_handler = "reject")]
pub enum LibraryListResponse {
    /// Newest-first page of library entries
    #[oai(status = 200)]
    Ok(Json<Vec<LibraryEntryDto>>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
error_reply!(LibraryListResponse);

#[derive(ApiResponse)]
#[oai(bad_request_handler = "reject")]
pub enum LibraryMergeResponse {
    /// One result per submitted item
    #[oai(status = 200)]
    Ok(Json<LibraryMergeDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
error_reply!(LibraryMergeResponse, not_found);

#[derive(ApiResponse)]
#[oai(bad_request_handler = "reject")]
pub enum ReconcileResponse {
    /// Counts of entries created and deleted
    #[oai(status = 200)]
    Ok(Json<ReconcileDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
error_reply!(ReconcileResponse);

#[derive(ApiResponse)]
#[oai(bad_request_handler = "reject")]
pub enum ReplaceResponse {
    /// The collection as now stored
    #[oai(status = 200)]
    Ok(Json<LibraryReplaceDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
error_reply!(ReplaceResponse);

#[derive(ApiResponse)]
#[oai(bad_request_handler = "reject")]
pub enum FingerprintResponse {
    /// Digest of the stored key set
    #[oai(status = 200)]
    Ok(Json<FingerprintDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
error_reply!(FingerprintResponse);

// ===== Misc =====

#[derive(ApiResponse)]
pub enum HealthResponse {
    /// Store reachable
    #[oai(status = 200)]
    Ok(PlainText<String>),

    /// Store unreachable
    #[oai(status = 503)]
    Unavailable(PlainText<String>),
}
