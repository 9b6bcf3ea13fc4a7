// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for handlers and collaborators

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors surfaced by route handlers
/// DOCUMENTATION: Each variant maps to one status code and one envelope shape.
/// Collaborator errors are logged at the handler boundary and converted here,
/// so the caller never sees the underlying error object.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request parameter (message names the field)
    #[error("{0}")]
    InvalidParameter(String),

    /// Upstream failure on a proxy route; only the generic message is exposed
    #[error("{0}")]
    Upstream(&'static str),

    /// Maintenance/monitoring failure; the collaborator's message goes in `details`
    #[error("{message}")]
    Maintenance {
        message: &'static str,
        details: String,
    },
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::InvalidParameter(message) => json!({ "error": message }),
            ApiError::Upstream(message) => json!({ "error": message }),
            ApiError::Maintenance { message, details } => json!({
                "success": false,
                "error": message,
                "details": details,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Maintenance { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Use the first field message from a failed `validate()` call
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request parameters".to_string());

        ApiError::InvalidParameter(message)
    }
}

/// Errors from the Google Places client
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Google Places API error: {0}")]
    ExternalApi(String),

    #[error("Place not found: {0}")]
    NotFound(String),

    #[error("Google Places API quota exceeded")]
    RateLimitExceeded,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors from the auth provider code exchange
/// DOCUMENTATION: Display text is what ends up in the error redirect
#[derive(Error, Debug)]
pub enum AuthError {
    /// Provider rejected the exchange; carries the provider's own message
    #[error("{0}")]
    Provider(String),

    #[error("Auth provider unreachable: {0}")]
    Network(String),

    #[error("Auth provider returned an unreadable session: {0}")]
    InvalidSession(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthError::InvalidSession(err.to_string())
        } else {
            AuthError::Network(err.to_string())
        }
    }
}

/// Errors from database maintenance and index analysis
#[derive(Error, Debug)]
pub enum MaintenanceError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for MaintenanceError {
    fn from(err: sqlx::Error) -> Self {
        MaintenanceError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Params {
        #[validate(required(message = "placeId parameter is required"))]
        place_id: Option<String>,
    }

    #[actix_web::test]
    async fn test_invalid_parameter_is_400_with_error_key() {
        let err = ApiError::InvalidParameter("Query parameter is required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Query parameter is required");
    }

    #[actix_web::test]
    async fn test_maintenance_error_envelope() {
        let err = ApiError::Maintenance {
            message: "Failed to generate maintenance report",
            details: "Database error: connection refused".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to generate maintenance report");
        assert_eq!(json["details"], "Database error: connection refused");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_validation_errors_use_field_message() {
        let err: ApiError = Params { place_id: None }.validate().unwrap_err().into();
        assert_eq!(err.to_string(), "placeId parameter is required");
    }

    #[test]
    fn test_auth_provider_error_displays_raw_message() {
        let err = AuthError::Provider("invalid flow state, no valid flow state found".to_string());
        assert_eq!(err.to_string(), "invalid flow state, no valid flow state found");
    }
}
