//! Catalog query endpoint
//!
//! Accepts a free-text term or a source key, fans the query out to every
//! source available to the caller and returns the merged successes.
//! Per-source failures never surface here: the response is 200 with however
//! many items survived, possibly none.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Extension, Json,
};
use mcb_common::ContentItem;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::AggregationRequest;
use crate::api::auth::AuthedUser;
use crate::AppState;

/// Query parameters for the catalog search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text term, or a source key for direct browse
    #[serde(default)]
    pub q: String,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Search response envelope
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ContentItem>,
}

/// GET /api/search?q=term
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let cache = cache_headers(state.config.cache_max_age_secs);

    let term = query.q.trim();
    if term.is_empty() {
        return (
            cache,
            Json(SearchResponse {
                results: Vec::new(),
            }),
        )
            .into_response();
    }

    let request = AggregationRequest {
        term: term.to_string(),
        page: query.page.max(1),
        sources: state.registry.sources_for(&user.0),
        per_source_timeout: state.per_source_timeout(),
    };
    let result = state.aggregator.run(request).await;

    debug!(
        user = %user.0,
        term,
        count = result.items.len(),
        "Search complete"
    );

    (
        cache,
        Json(SearchResponse {
            results: result.items,
        }),
    )
        .into_response()
}

/// Cache directives passed through from configuration; the core does not
/// interpret the duration
fn cache_headers(max_age_secs: u64) -> [(HeaderName, String); 2] {
    let directive = format!(
        "public, max-age={}, s-maxage={}",
        max_age_secs, max_age_secs
    );
    [
        (header::CACHE_CONTROL, directive.clone()),
        (HeaderName::from_static("cdn-cache-control"), directive),
    ]
}
