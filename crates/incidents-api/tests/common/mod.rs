#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use incidents_api::config::Config;
use incidents_api::router::build_router;
use incidents_api::state::{AppState, AppStateInner};
use incidents_db::TableNames;
use incidents_db::models::TokenRow;

pub const BUCKET: &str = "notifications-archive";

/// A router backed by a throwaway SQLite file and archive directory.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        db_path: dir.path().join("incidents.db"),
        archive_root: dir.path().join("archive"),
        tables: TableNames {
            users: "users".into(),
            tokens: "tokens".into(),
            incidents: "incidents".into(),
            notifications: "notifications".into(),
        },
        notifications_bucket: BUCKET.into(),
    };
    let state = AppStateInner::from_config(&config)
        .await
        .expect("state should build");

    TestApp {
        router: build_router(state.clone()),
        state,
        dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).expect("response body should be JSON");
        (status, body)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");
        self.send(request).await
    }

    pub async fn register(&self, login_id: &str, password: &str, role: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "login_id": login_id,
                    "password": password,
                    "role": role,
                    "first_name": "Test",
                    "last_name": "User",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["user_id"].as_str().expect("user_id").to_string()
    }

    pub async fn login(&self, login_id: &str, password: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "login_id": login_id, "password": password })),
        )
        .await
    }

    /// Register and log in a fresh user, returning `(user_id, token)`.
    pub async fn user_with_role(&self, login_id: &str, role: &str) -> (String, String) {
        let user_id = self.register(login_id, "pw-123456", role).await;
        let (status, body) = self.login(login_id, "pw-123456").await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        (user_id, body["token"].as_str().expect("token").to_string())
    }

    pub async fn create_incident(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, "/incidents", Some(token), Some(body)).await
    }

    /// Insert a token row directly, bypassing login.
    pub fn insert_token(&self, token: &str, user_id: &str, role: &str, expires_at: &str) {
        self.state
            .db
            .insert_token(&TokenRow {
                token_value: token.into(),
                token_id: format!("{}-id", token),
                user_id: user_id.into(),
                role: role.into(),
                issued_at: "2024-01-01 00:00:00".into(),
                expires_at: expires_at.into(),
            })
            .expect("token insert");
    }

    pub fn count(&self, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        self.state
            .db
            .with_conn(|conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
            .expect("count query")
    }

    /// `(notification_id, recipient, message)` for every stored notification.
    pub fn notifications(&self) -> Vec<(String, String, String)> {
        self.state
            .db
            .with_conn(|conn| {
                let mut stmt =
                    conn.prepare("SELECT notification_id, recipient, message FROM notifications")?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .expect("notification query")
    }

    pub fn archive_path(&self, key: &str) -> PathBuf {
        self.dir.path().join("archive").join(BUCKET).join(key)
    }

    pub fn read_archived(&self, key: &str) -> Value {
        let raw = std::fs::read(self.archive_path(key)).expect("archived object should exist");
        serde_json::from_slice(&raw).expect("archived object should be JSON")
    }
}

pub fn incident_body() -> Value {
    json!({
        "description": "Water leaking from the ceiling",
        "type": "infrastructure",
        "location": "Library, 2nd floor",
        "urgency": "high",
    })
}
