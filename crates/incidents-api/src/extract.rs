use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// JSON body extractor that reports every failure as a validation error.
///
/// Accepts either a JSON object or a JSON string whose contents are the
/// encoded object, since some gateways forward the body double-encoded.
/// The `Content-Type` header is not inspected.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(format!("could not read request body: {}", e)))?;
        parse_body(&bytes).map(JsonBody)
    }
}

pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::Validation("missing request body".into()));
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::Validation(format!("malformed JSON body: {}", e)))?;

    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| ApiError::Validation(format!("malformed JSON body: {}", e)))?,
        other => other,
    };

    serde_json::from_value(value)
        .map_err(|e| ApiError::Validation(format!("invalid request body: {}", e)))
}
