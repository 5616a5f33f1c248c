use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tokio::fs;
use tracing::info;

/// Write-only blob sink for serialized notifications.
///
/// Each object lives at `{root}/{bucket}/{key}`. Keys are `/`-separated
/// relative paths; nothing is ever read back or compacted.
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    pub async fn new(root: &Path, bucket: &str) -> Result<Self> {
        let dir = root.join(bucket);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating archive bucket {}", dir.display()))?;
        info!("Notification archive directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Filesystem location of the object stored under `key`.
    pub fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            bail!("invalid archive key '{}'", key);
        }
        Ok(self.dir.join(relative))
    }

    /// Serialize `value` as JSON and store it under `key`, replacing any
    /// previous object with the same key.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.object_path(key)?;
        let body = serde_json::to_vec(value)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &body)
            .await
            .with_context(|| format!("writing archive object {}", key))?;

        info!("Archived {} ({} bytes)", key, body.len());
        Ok(())
    }
}

/// Key for the notification written when an incident is created.
pub fn creation_key(notification_id: &str) -> String {
    format!("notifications/{}.json", notification_id)
}

/// Key for an update notification, grouped under its recipient.
pub fn update_key(recipient: &str, notification_id: &str) -> String {
    format!("notifications/{}/{}.json", recipient, notification_id)
}
