//! Records as they are stored and returned to clients.

use serde::{Deserialize, Serialize};

pub const ROLE_STUDENT: &str = "student";

pub const PHASE_PENDING: &str = "pending";
pub const PHASE_RESOLVED: &str = "resolved";

pub const DEFAULT_SEVERITY: &str = "medium";

/// Notifications are written with this status and never transitioned.
pub const NOTIFICATION_STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub incident_type: String,
    pub location: String,
    pub urgency: String,
    pub severity: String,
    pub phase: String,
    pub resolution_time: Option<String>,
    pub created_at: String,
    pub reported_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    pub incident_id: String,
    pub message: String,
    pub created_at: String,
    pub status: String,
    /// Either a user id or a role name.
    pub recipient: String,
}
