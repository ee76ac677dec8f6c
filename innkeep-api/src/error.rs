use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use innkeep_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

// Malformed or incomplete request bodies are a caller error, not a framework
// detail: fold them into the domain taxonomy so they surface as 400.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Domain(DomainError::ValidationError(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Domain(err) => match err {
                DomainError::InvalidInterval(_) | DomainError::ValidationError(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                DomainError::RoomNotFound(_) | DomainError::ReservationNotFound(_) => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                DomainError::ReservationConflict(_) => (StatusCode::CONFLICT, err.to_string()),
                DomainError::PermissionDenied => (StatusCode::FORBIDDEN, err.to_string()),
                DomainError::Store(msg) => {
                    tracing::error!("Store failure: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                    )
                }
            },
            ApiError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
