// src/handlers/auth.rs
// DOCUMENTATION: OAuth callback and auth error page
// PURPOSE: Exchange the provider code for a session and redirect the browser

use crate::handlers::query::FirstQuery;
use crate::models::Session;
use crate::services::AuthProvider;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::Deserialize;

/// Where the browser lands after sign-in
pub const LANDING_ROUTE: &str = "/lists";
/// Page that displays ?message=
pub const ERROR_ROUTE: &str = "/auth/error";

pub const CODE_VERIFIER_COOKIE: &str = "sb-code-verifier";
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Refresh tokens outlive the access token; keep them for 30 days
const REFRESH_TOKEN_MAX_AGE_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorPageParams {
    pub message: Option<String>,
}

fn redirect(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::TemporaryRedirect();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder
}

/// Redirect target for a failed sign-in
pub fn error_location(message: &str) -> String {
    format!("{}?message={}", ERROR_ROUTE, urlencoding::encode(message))
}

fn session_cookies(session: &Session, secure: bool) -> [Cookie<'static>; 2] {
    let access = Cookie::build(ACCESS_TOKEN_COOKIE, session.access_token.clone())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(session.expires_in))
        .finish();

    let refresh = Cookie::build(REFRESH_TOKEN_COOKIE, session.refresh_token.clone())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(REFRESH_TOKEN_MAX_AGE_DAYS))
        .finish();

    [access, refresh]
}

/// GET /auth/callback?code= | ?error=
/// DOCUMENTATION: Three outcomes, all redirects:
/// provider error -> error page, failed exchange -> error page, otherwise -> /lists
pub async fn auth_callback(
    auth: web::Data<dyn AuthProvider>,
    req: HttpRequest,
    params: FirstQuery<CallbackParams>,
) -> HttpResponse {
    let CallbackParams { code, error } = params.into_inner();

    if let Some(error) = error.filter(|e| !e.is_empty()) {
        log::warn!("OAuth provider redirected with error: {}", error);
        return redirect(&error_location(&error)).finish();
    }

    let mut response = redirect(LANDING_ROUTE);

    if let Some(code) = code.filter(|c| !c.is_empty()) {
        let verifier = req
            .cookie(CODE_VERIFIER_COOKIE)
            .map(|c| c.value().to_string());

        match auth
            .exchange_code_for_session(&code, verifier.as_deref())
            .await
        {
            Ok(session) => {
                log::info!("Session established for user {}", session.user.id);

                let secure = req.connection_info().scheme() == "https";
                for cookie in session_cookies(&session, secure) {
                    response.cookie(cookie);
                }

                if verifier.is_some() {
                    let mut spent = Cookie::named(CODE_VERIFIER_COOKIE);
                    spent.set_path("/");
                    spent.make_removal();
                    response.cookie(spent);
                }
            }
            Err(e) => {
                log::error!("Auth code exchange failed: {}", e);
                return redirect(&error_location(&e.to_string())).finish();
            }
        }
    }

    response.finish()
}

/// GET /auth/error?message=
pub async fn auth_error_page(params: FirstQuery<ErrorPageParams>) -> HttpResponse {
    let message = params
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("Something went wrong while signing you in.");

    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Sign-in error</title></head>\n<body>\n<h1>Sign-in error</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to home</a></p>\n</body>\n</html>\n",
        escape_html(message)
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Configuration for auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/callback", web::get().to(auth_callback))
            .route("/error", web::get().to(auth_error_page)),
    );
}
