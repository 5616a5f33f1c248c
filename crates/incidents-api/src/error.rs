use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use incidents_types::api::ErrorBody;
use tracing::{error, warn};

/// Errors surfaced by request handlers. Each variant maps to exactly one
/// status code and renders as `{ "error": "<message>" }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Missing, unknown or under-privileged token, or bad credentials.
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    /// Any storage, archive or runtime fault. The raw message is returned to
    /// the caller; this service is an internal tool.
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(msg) => error!("Internal error: {}", msg),
            ApiError::Auth(msg) => warn!("Rejected request: {}", msg),
            _ => {}
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Auth("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_becomes_internal_with_context() {
        let err = anyhow::anyhow!("disk full").context("writing archive object");
        let api: ApiError = err.into();
        assert!(matches!(&api, ApiError::Internal(msg) if msg == "writing archive object: disk full"));
    }
}
