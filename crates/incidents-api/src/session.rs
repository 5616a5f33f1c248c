//! Bearer-token session resolution shared by every authenticated route.
//!
//! A route declares what it needs through a [`SessionPolicy`] and takes an
//! [`Authorized<P>`] extractor. The extractor looks the token up in the
//! session store, optionally checks expiry, and applies the policy's role gate.
//!
//! Only [`ValidateToken`] enforces expiry. The incident routes accept expired
//! tokens, which is how existing clients behave today.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use incidents_types::models::ROLE_STUDENT;
use incidents_types::time::{is_expired, now_timestamp};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

/// Which roles may pass a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    Any,
    StudentOnly,
    NonStudent,
}

impl RoleGate {
    pub fn allows(self, role: &str) -> bool {
        match self {
            RoleGate::Any => true,
            RoleGate::StudentOnly => role == ROLE_STUDENT,
            RoleGate::NonStudent => role != ROLE_STUDENT,
        }
    }
}

pub trait SessionPolicy {
    const GATE: RoleGate;
    const ENFORCE_EXPIRY: bool;
    /// Message returned when the role gate rejects the caller.
    const DENIED: &'static str;
}

/// `GET /auth/validate`: any role, expiry enforced.
pub struct ValidateToken;

impl SessionPolicy for ValidateToken {
    const GATE: RoleGate = RoleGate::Any;
    const ENFORCE_EXPIRY: bool = true;
    const DENIED: &'static str = "";
}

/// Filing a new incident.
pub struct ReportIncident;

impl SessionPolicy for ReportIncident {
    const GATE: RoleGate = RoleGate::StudentOnly;
    const ENFORCE_EXPIRY: bool = false;
    const DENIED: &'static str = "only students can create incidents";
}

/// Moving an incident to a new phase.
pub struct ReviewIncident;

impl SessionPolicy for ReviewIncident {
    const GATE: RoleGate = RoleGate::NonStudent;
    const ENFORCE_EXPIRY: bool = false;
    const DENIED: &'static str = "only non-student roles can update incidents";
}

pub struct ViewHistory;

impl SessionPolicy for ViewHistory {
    const GATE: RoleGate = RoleGate::NonStudent;
    const ENFORCE_EXPIRY: bool = false;
    const DENIED: &'static str = "only non-student roles can view the incident history";
}

/// Identity behind a resolved token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub role: String,
    pub token_id: String,
}

pub struct Authorized<P>(pub Session, PhantomData<fn() -> P>);

impl<P> Authorized<P> {
    pub fn into_session(self) -> Session {
        self.0
    }
}

impl<P: SessionPolicy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let session = resolve(state, token, P::ENFORCE_EXPIRY).await?;

        if !P::GATE.allows(&session.role) {
            return Err(ApiError::Auth(P::DENIED.to_string()));
        }
        Ok(Authorized(session, PhantomData))
    }
}

/// Token from an `Authorization: Bearer <token>` header. A value without the
/// `Bearer ` prefix is taken as the token itself.
pub fn bearer_token(headers: &HeaderMap) -> ApiResult<String> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Validation("missing Authorization header".into()))?
        .to_str()
        .map_err(|_| ApiError::Validation("malformed Authorization header".into()))?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(ApiError::Validation("missing bearer token".into()));
    }
    Ok(token.to_string())
}

pub async fn resolve(state: &AppState, token: String, enforce_expiry: bool) -> ApiResult<Session> {
    let row = with_db(state, move |db| db.get_token(&token))
        .await?
        .ok_or_else(|| ApiError::Auth("invalid or unknown token".into()))?;

    if enforce_expiry && is_expired(&now_timestamp(), &row.expires_at) {
        return Err(ApiError::Auth("token expired".into()));
    }

    Ok(Session {
        user_id: row.user_id,
        role: row.role,
        token_id: row.token_id,
    })
}
