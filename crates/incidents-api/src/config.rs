use std::path::PathBuf;

use incidents_db::TableNames;

pub const ENV_HOST: &str = "INCIDENTS_HOST";
pub const ENV_PORT: &str = "INCIDENTS_PORT";
pub const ENV_DB_PATH: &str = "INCIDENTS_DB_PATH";
pub const ENV_ARCHIVE_ROOT: &str = "INCIDENTS_ARCHIVE_ROOT";
pub const ENV_TABLE_USERS: &str = "INCIDENTS_TABLE_USERS";
pub const ENV_TABLE_TOKENS: &str = "INCIDENTS_TABLE_TOKENS";
pub const ENV_TABLE_INCIDENTS: &str = "INCIDENTS_TABLE_INCIDENTS";
pub const ENV_TABLE_NOTIFICATIONS: &str = "INCIDENTS_TABLE_NOTIFICATIONS";
pub const ENV_NOTIFICATIONS_BUCKET: &str = "INCIDENTS_NOTIFICATIONS_BUCKET";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is not a valid port: {1}")]
    InvalidPort(&'static str, String),

    #[error("invalid table configuration: {0}")]
    InvalidTables(String),

    #[error("bucket name '{0}' must be a single path segment")]
    InvalidBucket(String),
}

/// Process configuration. The store table names and the archive bucket are
/// required; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub archive_root: PathBuf,
    pub tables: TableNames,
    pub notifications_bucket: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port = match lookup(ENV_PORT) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidPort(ENV_PORT, raw))?,
            None => 3000,
        };

        let config = Self {
            host: lookup(ENV_HOST).unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: lookup(ENV_DB_PATH)
                .unwrap_or_else(|| "incidents.db".into())
                .into(),
            archive_root: lookup(ENV_ARCHIVE_ROOT)
                .unwrap_or_else(|| "./archive".into())
                .into(),
            tables: TableNames {
                users: required(ENV_TABLE_USERS)?,
                tokens: required(ENV_TABLE_TOKENS)?,
                incidents: required(ENV_TABLE_INCIDENTS)?,
                notifications: required(ENV_TABLE_NOTIFICATIONS)?,
            },
            notifications_bucket: required(ENV_NOTIFICATIONS_BUCKET)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tables
            .validate()
            .map_err(|e| ConfigError::InvalidTables(e.to_string()))?;

        let bucket = self.notifications_bucket.as_str();
        if bucket.is_empty()
            || bucket == "."
            || bucket == ".."
            || bucket.contains(['/', '\\'])
        {
            return Err(ConfigError::InvalidBucket(bucket.to_string()));
        }
        Ok(())
    }
}
