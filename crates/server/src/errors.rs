use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// Maps service errors onto the HTTP contract: read misses are 404 and
/// write-target misses are 400, both with the error's display string as a
/// plain-text body; everything else is a 500 with a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let msg = self.0.to_string();
        match self.0 {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, msg).into_response(),
            ServiceError::UpdateTargetMissing(_) | ServiceError::DeleteTargetMissing(_) => {
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            _ => {
                error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": msg})),
                )
                    .into_response()
            }
        }
    }
}
