// src/services/supabase_auth.rs
// DOCUMENTATION: Supabase (GoTrue) auth client
// PURPOSE: Exchange an OAuth authorization code for a session

use crate::errors::AuthError;
use crate::models::Session;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Auth collaborator used by /auth/callback
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Trade an authorization code (plus the PKCE verifier, when the browser
    /// still holds it) for a session
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<Session, AuthError>;
}

pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Serialize)]
struct PkceExchangeRequest<'a> {
    auth_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
}

/// GoTrue error payload
/// DOCUMENTATION: Depending on version the text is in `error_description`,
/// `msg` or `message`
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ProviderErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

impl SupabaseAuthClient {
    /// DOCUMENTATION: Fails only when the HTTP client cannot be built
    pub fn new(
        supabase_url: &str,
        anon_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: supabase_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<Session, AuthError> {
        let url = format!("{}/auth/v1/token", self.base_url);

        log::debug!("Exchanging auth code (verifier present: {})", code_verifier.is_some());

        let response = self
            .client
            .post(&url)
            .query(&[("grant_type", "pkce")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&PkceExchangeRequest {
                auth_code: code,
                code_verifier,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Session>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .ok()
            .and_then(ProviderErrorBody::into_message)
            .unwrap_or_else(|| format!("Code exchange failed with status {}", status));

        log::warn!("Supabase code exchange rejected ({}): {}", status, message);
        Err(AuthError::Provider(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_project_url() {
        let client = SupabaseAuthClient::new(
            "https://demo.supabase.co/",
            "anon".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://demo.supabase.co");
        assert_eq!(client.anon_key, "anon");
    }

    #[test]
    fn test_error_body_prefers_description() {
        let body: ProviderErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid auth code"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid auth code"));
    }

    #[test]
    fn test_error_body_msg_field() {
        let body: ProviderErrorBody = serde_json::from_str(
            r#"{"code":400,"error_code":"flow_state_not_found","msg":"invalid flow state, no valid flow state found"}"#,
        )
        .unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("invalid flow state, no valid flow state found")
        );
    }

    #[test]
    fn test_exchange_request_omits_missing_verifier() {
        let json = serde_json::to_value(PkceExchangeRequest {
            auth_code: "abc123",
            code_verifier: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "auth_code": "abc123" }));
    }
}
