/// Rows that never leave the server. Incidents and notifications are stored
/// exactly as the wire records in `incidents_types::models`.

pub struct UserRow {
    pub user_id: String,
    pub login_id: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub registered_at: String,
}

pub struct TokenRow {
    pub token_value: String,
    pub token_id: String,
    pub user_id: String,
    pub role: String,
    pub issued_at: String,
    pub expires_at: String,
}
