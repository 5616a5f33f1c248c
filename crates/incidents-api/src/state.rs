use std::sync::Arc;

use anyhow::Result;
use incidents_db::Database;
use tracing::error;

use crate::archive::Archive;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub archive: Archive,
}

impl AppStateInner {
    pub async fn from_config(config: &Config) -> Result<AppState> {
        let tables = config.tables.clone();
        let db_path = config.db_path.clone();
        let db = tokio::task::spawn_blocking(move || Database::open(&db_path, tables)).await??;
        let archive = Archive::new(&config.archive_root, &config.notifications_bucket).await?;
        Ok(Arc::new(Self { db, archive }))
    }
}

/// Run a blocking database call off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::from)
}
