//! Browse session endpoints
//!
//! One browse controller per authenticated user, created on first access.
//! Select and more are fire-and-forget dispatches; state reads the
//! controller's published view. Stale fetch completions are discarded
//! inside the session, so the view only ever reflects the latest selection.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use crate::api::auth::AuthedUser;
use crate::browse::controller::BrowseView;
use crate::browse::BrowseParams;
use crate::AppState;

/// POST /api/browse/select
///
/// Replace the caller's selection parameters. Resets the accumulated
/// listing and dispatches the first page.
pub async fn browse_select(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(params): Json<BrowseParams>,
) -> Result<StatusCode, BrowseError> {
    state
        .browse_handle(&user.0)
        .select(params)
        .map_err(|_| BrowseError::SessionGone)?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/browse/more
///
/// Ask for the next page. A no-op unless the session is ready with more
/// results available.
pub async fn browse_more(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<StatusCode, BrowseError> {
    state
        .browse_handle(&user.0)
        .load_more()
        .map_err(|_| BrowseError::SessionGone)?;
    Ok(StatusCode::ACCEPTED)
}

/// GET /api/browse/state
///
/// Current view of the caller's browse session.
pub async fn browse_state(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> Json<BrowseView> {
    Json(state.browse_handle(&user.0).view())
}

/// Browse endpoint errors
#[derive(Debug)]
pub enum BrowseError {
    SessionGone,
}

impl IntoResponse for BrowseError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "Browse session is no longer running",
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
