//! mcb-ui library - Media Catalog Browser user-facing service
//!
//! Aggregates catalog metadata from independently operated content providers
//! and serves it through a paginated, filterable browsing API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use mcb_common::config::Config;
use tower_http::trace::TraceLayer;

pub mod aggregate;
pub mod api;
pub mod browse;
pub mod calendar;
pub mod filter;
pub mod guard;
pub mod sources;

use aggregate::Aggregator;
use browse::controller::{BrowseController, BrowseHandle, CatalogService};
use calendar::Calendar;
use filter::ContentFilter;
use sources::SourceRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Ordered content sources available to callers
    pub registry: Arc<SourceRegistry>,
    pub aggregator: Arc<Aggregator>,
    pub calendar: Arc<Calendar>,
    /// Shared secret for session tokens; 0 disables auth checking
    pub shared_secret: i64,
    /// One browse controller per authenticated user, created on first use
    sessions: Arc<Mutex<HashMap<String, BrowseHandle>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, registry: SourceRegistry, shared_secret: i64) -> Self {
        let aggregator = Aggregator::new(ContentFilter::new(&config.filter));
        let calendar = Calendar::from_config(&config.schedule);
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            aggregator: Arc::new(aggregator),
            calendar: Arc::new(calendar),
            shared_secret,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Per-source call budget from configuration
    pub fn per_source_timeout(&self) -> Duration {
        Duration::from_millis(self.config.per_source_timeout_ms)
    }

    /// Browse controller for the given user, spawning one on first access
    pub fn browse_handle(&self, username: &str) -> BrowseHandle {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(username.to_string())
            .or_insert_with(|| {
                let fetcher = CatalogService::new(
                    Arc::clone(&self.aggregator),
                    Arc::clone(&self.calendar),
                    Arc::clone(&self.registry),
                    self.per_source_timeout(),
                    username.to_string(),
                );
                BrowseController::spawn(Arc::new(fetcher))
            })
            .clone()
    }
}

/// Build application router
///
/// Health endpoint is public; everything else requires an authenticated
/// session (or shared_secret = 0, which disables checking).
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/api/search", get(api::search))
        .route("/api/browse/select", post(api::browse_select))
        .route("/api/browse/more", post(api::browse_more))
        .route("/api/browse/state", get(api::browse_state))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new().merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
