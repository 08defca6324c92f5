//! Session authentication middleware
//!
//! Validates the caller's session token (cookie or bearer header) and
//! injects the username into request extensions. A shared secret of 0
//! disables all checking and callers become "anonymous".

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use mcb_common::session::validate_token;
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// Session cookie name
pub const SESSION_COOKIE: &str = "mcb_session";

/// Username of the authenticated caller, available to handlers via
/// `Extension<AuthedUser>`
#[derive(Debug, Clone)]
pub struct AuthedUser(pub String);

/// Authentication middleware
///
/// Applied to protected routes only; the health endpoint stays public.
/// Returns 401 Unauthorized before any aggregation work happens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Special case: secret = 0 disables all auth checking
    if state.shared_secret == 0 {
        request
            .extensions_mut()
            .insert(AuthedUser("anonymous".to_string()));
        return Ok(next.run(request).await);
    }

    let token = extract_token(&request).ok_or(AuthError::MissingToken)?;

    let max_age_ms = state.config.auth.session_max_age_secs as i64 * 1000;
    let username = validate_token(&token, state.shared_secret, max_age_ms).map_err(|e| {
        warn!(error = %e, "Session validation failed");
        AuthError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthedUser(username));
    Ok(next.run(request).await)
}

/// Session token from the `mcb_session` cookie or a bearer Authorization
/// header
fn extract_token(request: &Request) -> Option<String> {
    if let Some(cookies) = request
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
    {
        for pair in cookies.split(';') {
            if let Some(value) = pair
                .trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
            {
                return Some(value.to_string());
            }
        }
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Both cases present the same way: the caller is not authenticated
        let body = Json(json!({
            "error": "Unauthorized",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
