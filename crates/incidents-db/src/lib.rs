pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::{Result, bail};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Names of the four tables backing the credential, session, incident and
/// notification stores. They are interpolated into SQL, so each must be a
/// plain identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub users: String,
    pub tokens: String,
    pub incidents: String,
    pub notifications: String,
}

impl TableNames {
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("users", &self.users),
            ("tokens", &self.tokens),
            ("incidents", &self.incidents),
            ("notifications", &self.notifications),
        ];
        for (store, name) in names {
            if name.is_empty() {
                bail!("table name for the {} store is empty", store);
            }
            if !is_identifier(name) {
                bail!("table name '{}' for the {} store is not a valid identifier", name, store);
            }
        }
        for (i, (_, a)) in names.iter().enumerate() {
            if names[i + 1..].iter().any(|(_, b)| b.eq_ignore_ascii_case(a)) {
                bail!("table name '{}' is used by more than one store", a);
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub struct Database {
    conn: Mutex<Connection>,
    tables: TableNames,
}

impl Database {
    pub fn open(path: &Path, tables: TableNames) -> Result<Self> {
        tables.validate()?;
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn, &tables)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            tables,
        })
    }

    pub fn open_in_memory(tables: TableNames) -> Result<Self> {
        tables.validate()?;
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn, &tables)?;
        Ok(Self {
            conn: Mutex::new(conn),
            tables,
        })
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

#[cfg(test)]
pub(crate) fn test_tables() -> TableNames {
    TableNames {
        users: "users".into(),
        tokens: "tokens".into(),
        incidents: "incidents".into(),
        notifications: "notifications".into(),
    }
}
