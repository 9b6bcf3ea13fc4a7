// src/models/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session returned by the Supabase code exchange
/// DOCUMENTATION: Structure owned by the provider; only the fields the
/// callback needs are typed, the rest of the user object is ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    /// Unix timestamp of expiry (not always present)
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
