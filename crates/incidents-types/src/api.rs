use serde::{Deserialize, Serialize};

// -- Auth --

/// Every field is optional at the wire level so that a missing field is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub login_id: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub login_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub role: String,
}

// -- Incidents --

#[derive(Debug, Default, Deserialize)]
pub struct CreateIncidentRequest {
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub incident_type: Option<String>,
    pub location: Option<String>,
    pub urgency: Option<String>,
    pub severity: Option<String>,
}

/// `fase` is the wire name clients already send for the new phase.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIncidentRequest {
    pub incident_id: Option<String>,
    pub fase: Option<String>,
    pub resolution_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IncidentResponse {
    pub message: String,
    pub incident_id: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Returns the value when it is present and non-empty.
pub fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_reads_type_field() {
        let req: CreateIncidentRequest = serde_json::from_str(
            r#"{"description":"leak","type":"plumbing","location":"B2","urgency":"high"}"#,
        )
        .unwrap();
        assert_eq!(req.incident_type.as_deref(), Some("plumbing"));
        assert!(req.severity.is_none());
    }

    #[test]
    fn test_required_rejects_empty() {
        assert_eq!(required(&Some("x".into())), Some("x"));
        assert_eq!(required(&Some(String::new())), None);
        assert_eq!(required(&None), None);
    }
}
