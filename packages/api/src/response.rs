// ABOUTME: Shared API response envelope and typed error-to-status mapping
// ABOUTME: Guard violations are 409, typed NotFound is 404, the rest stays generic

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json as ResponseJson, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use formiq_ai::AiServiceError;
use formiq_storage::StorageError;
use formiq_workflow::WorkflowError;

/// Standard API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Ai(#[from] AiServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Storage(
                e @ (StorageError::UnknownQuestion(_) | StorageError::ForeignFocusItem { .. }),
            ) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Storage(e) if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
            ApiError::Storage(e) if e.is_conflict() => (StatusCode::CONFLICT, e.to_string()),
            ApiError::Workflow(WorkflowError::AlreadyRunning(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            _ => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
