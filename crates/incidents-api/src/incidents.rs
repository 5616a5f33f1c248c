use axum::{Json, extract::State};
use tracing::info;
use uuid::Uuid;

use incidents_types::api::{CreateIncidentRequest, IncidentResponse, UpdateIncidentRequest, required};
use incidents_types::models::{
    DEFAULT_SEVERITY, Incident, NOTIFICATION_STATUS_PENDING, Notification, PHASE_PENDING,
    PHASE_RESOLVED, ROLE_STUDENT,
};
use incidents_types::time::now_timestamp;

use crate::archive::{creation_key, update_key};
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::session::{Authorized, ReportIncident, ReviewIncident, Session, ViewHistory};
use crate::state::{AppState, with_db};

/// POST /incidents — a student files an incident.
///
/// The incident, its notification row and the archived copy are three
/// independent writes; a failure part-way leaves the earlier ones in place.
pub async fn create_incident(
    State(state): State<AppState>,
    auth: Authorized<ReportIncident>,
    JsonBody(req): JsonBody<CreateIncidentRequest>,
) -> ApiResult<Json<IncidentResponse>> {
    let session = auth.into_session();

    let (Some(description), Some(incident_type), Some(location), Some(urgency)) = (
        required(&req.description),
        required(&req.incident_type),
        required(&req.location),
        required(&req.urgency),
    ) else {
        return Err(ApiError::Validation("missing fields in request body".into()));
    };

    let incident = Incident {
        incident_id: Uuid::new_v4().to_string(),
        description: description.to_string(),
        incident_type: incident_type.to_string(),
        location: location.to_string(),
        urgency: urgency.to_string(),
        severity: required(&req.severity).unwrap_or(DEFAULT_SEVERITY).to_string(),
        phase: PHASE_PENDING.to_string(),
        resolution_time: None,
        created_at: now_timestamp(),
        reported_by: session.user_id.clone(),
    };
    let notification = creation_notification(&incident, &session);
    let incident_id = incident.incident_id.clone();

    with_db(&state, move |db| db.insert_incident(&incident)).await?;

    let row = notification.clone();
    with_db(&state, move |db| db.insert_notification(&row)).await?;

    state
        .archive
        .put_json(&creation_key(&notification.notification_id), &notification)
        .await?;

    info!(
        "Incident {} created by {}; notification {} for {}",
        incident_id, session.user_id, notification.notification_id, notification.recipient
    );
    Ok(Json(IncidentResponse {
        message: "Incident and notification created successfully".into(),
        incident_id,
    }))
}

/// PUT /incidents — staff move an incident to a new phase.
///
/// `resolution_time` is only kept when the new phase is `resolved`; any other
/// phase clears it.
pub async fn update_incident(
    State(state): State<AppState>,
    _auth: Authorized<ReviewIncident>,
    JsonBody(req): JsonBody<UpdateIncidentRequest>,
) -> ApiResult<Json<IncidentResponse>> {
    let (Some(incident_id), Some(phase)) = (required(&req.incident_id), required(&req.fase)) else {
        return Err(ApiError::Validation("missing fields in request body".into()));
    };
    let incident_id = incident_id.to_string();
    let phase = phase.to_string();
    let resolution_time = if phase == PHASE_RESOLVED {
        required(&req.resolution_time).map(str::to_string)
    } else {
        None
    };

    let (id, new_phase) = (incident_id.clone(), phase.clone());
    let incident = with_db(&state, move |db| {
        db.update_incident_phase(&id, &new_phase, resolution_time.as_deref())?;
        db.get_incident(&id)
    })
    .await?;

    let reported_by = incident
        .map(|i| i.reported_by)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::NotFound("incident not found or has no reporter".into()))?;

    let notification = Notification {
        notification_id: Uuid::new_v4().to_string(),
        incident_id: incident_id.clone(),
        message: format!("Incident {} has been updated to phase {}.", incident_id, phase),
        created_at: now_timestamp(),
        status: NOTIFICATION_STATUS_PENDING.to_string(),
        recipient: reported_by,
    };

    let row = notification.clone();
    with_db(&state, move |db| db.insert_notification(&row)).await?;

    state
        .archive
        .put_json(
            &update_key(&notification.recipient, &notification.notification_id),
            &notification,
        )
        .await?;

    info!(
        "Incident {} moved to {}; notified {}",
        incident_id, phase, notification.recipient
    );
    Ok(Json(IncidentResponse {
        message: "Incident updated and notification generated successfully".into(),
        incident_id,
    }))
}

/// GET /incidents/history — every incident, unfiltered and unpaginated.
pub async fn get_history(
    State(state): State<AppState>,
    _auth: Authorized<ViewHistory>,
) -> ApiResult<Json<Vec<Incident>>> {
    let incidents = with_db(&state, |db| db.list_incidents()).await?;
    Ok(Json(incidents))
}

/// Students are notified about their own report. Any other creator would
/// address the whole role; the create route only admits students, so that
/// branch is not reached through HTTP today.
fn creation_notification(incident: &Incident, session: &Session) -> Notification {
    let (message, recipient) = if session.role == ROLE_STUDENT {
        (
            format!(
                "Incident created by you: {} at {}. Severity: {}.",
                incident.incident_type, incident.location, incident.severity
            ),
            session.user_id.clone(),
        )
    } else {
        (
            format!(
                "New incident reported: {} at {}. Severity: {}.",
                incident.incident_type, incident.location, incident.severity
            ),
            session.role.clone(),
        )
    };

    Notification {
        notification_id: Uuid::new_v4().to_string(),
        incident_id: incident.incident_id.clone(),
        message,
        created_at: now_timestamp(),
        status: NOTIFICATION_STATUS_PENDING.to_string(),
        recipient,
    }
}
