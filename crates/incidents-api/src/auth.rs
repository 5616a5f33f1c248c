use axum::{Json, extract::State};
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use incidents_db::models::{TokenRow, UserRow};
use incidents_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, required};
use incidents_types::time::{format_timestamp, now_timestamp, token_expiry};

use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::session::{Authorized, ValidateToken};
use crate::state::{AppState, with_db};

/// Body returned by `GET /auth/validate` for a live token.
pub const TOKEN_VALID: &str = "Token válido";

/// Hex-encoded SHA-256 of the password.
///
/// Unsalted and single-round. Kept because stored credentials already use
/// this format; moving to a salted KDF means rehashing at next login.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// POST /auth/register
///
/// Does not check whether `login_id` is already taken; a repeated
/// registration adds another user row.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let (Some(login_id), Some(password), Some(role), Some(first_name), Some(last_name)) = (
        required(&req.login_id),
        required(&req.password),
        required(&req.role),
        required(&req.first_name),
        required(&req.last_name),
    ) else {
        return Err(ApiError::Validation("missing fields in request body".into()));
    };

    let user = UserRow {
        user_id: Uuid::new_v4().to_string(),
        login_id: login_id.to_string(),
        password_hash: hash_password(password),
        role: role.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        registered_at: now_timestamp(),
    };
    let user_id = user.user_id.clone();
    let role = user.role.clone();

    with_db(&state, move |db| db.create_user(&user)).await?;

    info!("Registered user {} with role {}", user_id, role);
    Ok(Json(RegisterResponse {
        message: "User registered successfully".into(),
        user_id,
    }))
}

/// POST /auth/login
///
/// Issues a fresh token valid for one hour. Earlier tokens for the same user
/// stay valid until their own expiry.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(login_id), Some(password)) = (required(&req.login_id), required(&req.password)) else {
        return Err(ApiError::Validation("missing fields in request body".into()));
    };

    let lookup = login_id.to_string();
    let user = with_db(&state, move |db| db.get_user_by_login_id(&lookup))
        .await?
        .ok_or_else(|| ApiError::Auth("user does not exist".into()))?;

    if user.password_hash != hash_password(password) {
        return Err(ApiError::Auth("incorrect password".into()));
    }

    let issued = Utc::now();
    let token = TokenRow {
        token_value: Uuid::new_v4().to_string(),
        token_id: Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        role: user.role.clone(),
        issued_at: format_timestamp(issued),
        expires_at: format_timestamp(token_expiry(issued)),
    };
    let token_value = token.token_value.clone();
    let expires_at = token.expires_at.clone();

    with_db(&state, move |db| db.insert_token(&token)).await?;

    info!("Issued token for user {} (expires {})", user.user_id, expires_at);
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token: token_value,
        role: user.role,
    }))
}

/// GET /auth/validate
pub async fn validate(_auth: Authorized<ValidateToken>) -> Json<&'static str> {
    Json(TOKEN_VALID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_hex_sha256() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert_eq!(hash_password("password").len(), 64);
    }

    #[test]
    fn test_hash_is_deterministic_and_distinct() {
        assert_eq!(hash_password("s3cret"), hash_password("s3cret"));
        assert_ne!(hash_password("s3cret"), hash_password("S3cret"));
        assert_ne!(hash_password("s3cret"), "s3cret");
    }
}
