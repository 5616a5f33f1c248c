use crate::Database;
use crate::models::{TokenRow, UserRow};
use anyhow::Result;
use incidents_types::models::{Incident, Notification};
use rusqlite::{OptionalExtension, Row};

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &UserRow) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (user_id, login_id, password_hash, role, first_name, last_name, registered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            self.tables().users
        );
        self.with_conn(|conn| {
            conn.execute(
                &sql,
                rusqlite::params![
                    user.user_id,
                    user.login_id,
                    user.password_hash,
                    user.role,
                    user.first_name,
                    user.last_name,
                    user.registered_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Duplicate login ids are possible; the earliest registration wins.
    pub fn get_user_by_login_id(&self, login_id: &str) -> Result<Option<UserRow>> {
        let sql = format!(
            "SELECT user_id, login_id, password_hash, role, first_name, last_name, registered_at
             FROM {} WHERE login_id = ?1 ORDER BY rowid LIMIT 1",
            self.tables().users
        );
        self.with_conn(|conn| {
            let row = conn
                .query_row(&sql, [login_id], |row| {
                    Ok(UserRow {
                        user_id: row.get(0)?,
                        login_id: row.get(1)?,
                        password_hash: row.get(2)?,
                        role: row.get(3)?,
                        first_name: row.get(4)?,
                        last_name: row.get(5)?,
                        registered_at: row.get(6)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    // -- Tokens --

    pub fn insert_token(&self, token: &TokenRow) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (token_value, token_id, user_id, role, issued_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            self.tables().tokens
        );
        self.with_conn(|conn| {
            conn.execute(
                &sql,
                rusqlite::params![
                    token.token_value,
                    token.token_id,
                    token.user_id,
                    token.role,
                    token.issued_at,
                    token.expires_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_token(&self, token_value: &str) -> Result<Option<TokenRow>> {
        let sql = format!(
            "SELECT token_value, token_id, user_id, role, issued_at, expires_at
             FROM {} WHERE token_value = ?1",
            self.tables().tokens
        );
        self.with_conn(|conn| {
            let row = conn
                .query_row(&sql, [token_value], |row| {
                    Ok(TokenRow {
                        token_value: row.get(0)?,
                        token_id: row.get(1)?,
                        user_id: row.get(2)?,
                        role: row.get(3)?,
                        issued_at: row.get(4)?,
                        expires_at: row.get(5)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    // -- Incidents --

    pub fn insert_incident(&self, incident: &Incident) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (incident_id, description, incident_type, location, urgency, severity,
                             phase, resolution_time, created_at, reported_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            self.tables().incidents
        );
        self.with_conn(|conn| {
            conn.execute(
                &sql,
                rusqlite::params![
                    incident.incident_id,
                    incident.description,
                    incident.incident_type,
                    incident.location,
                    incident.urgency,
                    incident.severity,
                    incident.phase,
                    incident.resolution_time,
                    incident.created_at,
                    incident.reported_by,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_incident(&self, incident_id: &str) -> Result<Option<Incident>> {
        let sql = format!(
            "SELECT {INCIDENT_COLUMNS} FROM {} WHERE incident_id = ?1",
            self.tables().incidents
        );
        self.with_conn(|conn| Ok(conn.query_row(&sql, [incident_id], incident_from_row).optional()?))
    }

    /// Sets the phase and overwrites `resolution_time` (NULL clears it).
    /// Returns the number of rows touched; zero means the incident is unknown.
    pub fn update_incident_phase(
        &self,
        incident_id: &str,
        phase: &str,
        resolution_time: Option<&str>,
    ) -> Result<usize> {
        let sql = format!(
            "UPDATE {} SET phase = ?1, resolution_time = ?2 WHERE incident_id = ?3",
            self.tables().incidents
        );
        self.with_conn(|conn| {
            let changed = conn.execute(&sql, rusqlite::params![phase, resolution_time, incident_id])?;
            Ok(changed)
        })
    }

    /// Full, unfiltered scan. No ordering guarantee and no page limit.
    pub fn list_incidents(&self) -> Result<Vec<Incident>> {
        let sql = format!("SELECT {INCIDENT_COLUMNS} FROM {}", self.tables().incidents);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], incident_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Notifications --

    pub fn insert_notification(&self, notification: &Notification) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (notification_id, incident_id, message, created_at, status, recipient)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            self.tables().notifications
        );
        self.with_conn(|conn| {
            conn.execute(
                &sql,
                rusqlite::params![
                    notification.notification_id,
                    notification.incident_id,
                    notification.message,
                    notification.created_at,
                    notification.status,
                    notification.recipient,
                ],
            )?;
            Ok(())
        })
    }
}

const INCIDENT_COLUMNS: &str = "incident_id, description, incident_type, location, urgency, severity, \
                                phase, resolution_time, created_at, reported_by";

fn incident_from_row(row: &Row<'_>) -> rusqlite::Result<Incident> {
    Ok(Incident {
        incident_id: row.get(0)?,
        description: row.get(1)?,
        incident_type: row.get(2)?,
        location: row.get(3)?,
        urgency: row.get(4)?,
        severity: row.get(5)?,
        phase: row.get(6)?,
        resolution_time: row.get(7)?,
        created_at: row.get(8)?,
        reported_by: row.get(9)?,
    })
}
