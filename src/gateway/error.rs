use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{SIERRA_STATUS_ERROR, SIERRA_STATUS_HEADER};
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<ScoringError> for GatewayError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::InvalidInput { .. } => GatewayError::InvalidRequest(err.to_string()),
            ScoringError::Embedding(_) => GatewayError::EmbeddingFailed(err.to_string()),
            ScoringError::InvalidConfig { .. } | ScoringError::ComputationFailed { .. } => {
                GatewayError::InternalError(err.to_string())
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, sierra_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::EmbeddingFailed(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "embedding_error")
            }
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            SIERRA_STATUS_HEADER,
            HeaderValue::from_str(sierra_status)
                .unwrap_or(HeaderValue::from_static(SIERRA_STATUS_ERROR)),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
