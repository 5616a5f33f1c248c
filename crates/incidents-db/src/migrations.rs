use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use crate::TableNames;

pub fn run(conn: &Connection, tables: &TableNames) -> Result<()> {
    let TableNames {
        users,
        tokens,
        incidents,
        notifications,
    } = tables;

    // login_id is intentionally not UNIQUE: repeated registrations add rows.
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {users} (
            user_id         TEXT PRIMARY KEY,
            login_id        TEXT NOT NULL,
            password_hash   TEXT NOT NULL,
            role            TEXT NOT NULL,
            first_name      TEXT NOT NULL,
            last_name       TEXT NOT NULL,
            registered_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{users}_login_id
            ON {users}(login_id);

        CREATE TABLE IF NOT EXISTS {tokens} (
            token_value     TEXT PRIMARY KEY,
            token_id        TEXT NOT NULL UNIQUE,
            user_id         TEXT NOT NULL,
            role            TEXT NOT NULL,
            issued_at       TEXT NOT NULL,
            expires_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {incidents} (
            incident_id     TEXT PRIMARY KEY,
            description     TEXT NOT NULL,
            incident_type   TEXT NOT NULL,
            location        TEXT NOT NULL,
            urgency         TEXT NOT NULL,
            severity        TEXT NOT NULL,
            phase           TEXT NOT NULL,
            resolution_time TEXT,
            created_at      TEXT NOT NULL,
            reported_by     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {notifications} (
            notification_id TEXT PRIMARY KEY,
            incident_id     TEXT NOT NULL,
            message         TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            status          TEXT NOT NULL,
            recipient       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{notifications}_incident
            ON {notifications}(incident_id);
        "
    ))?;

    info!("Database migrations complete");
    Ok(())
}
