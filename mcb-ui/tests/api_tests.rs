//! Integration tests for mcb-ui API endpoints
//!
//! Covers the health endpoint, session authentication, the fan-out search
//! endpoint (partial failure, source order, direct source browse, category
//! filtering) and the cache header pass-through.

mod helpers;

use axum::http::StatusCode;
use helpers::*;
use mcb_common::config::{Config, FilterConfig};
use mcb_common::session;
use mcb_ui::build_router;
use mcb_ui::sources::SourceQuery;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let app = test_app(Vec::new());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "mcb-ui");
    assert!(body["version"].is_string());
}

// =============================================================================
// Authentication Tests
// =============================================================================

const SECRET: i64 = 123_456_789;

fn authed_app() -> axum::Router {
    let sources: Vec<Arc<dyn SourceQuery>> =
        vec![Arc::new(MockSource::new("alpha").with_items(&["a1"]))];
    build_router(test_state(sources, test_config(), SECRET))
}

#[tokio::test]
async fn test_search_without_session_rejected() {
    let app = authed_app();

    let response = app.oneshot(get("/api/search?q=drama")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_search_with_valid_session() {
    let app = authed_app();
    let token = session::issue_token("alice", SECRET);

    let response = app
        .oneshot(get_with_session("/api/search?q=drama", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(result_titles(&body), vec!["a1"]);
}

#[tokio::test]
async fn test_search_with_tampered_session_rejected() {
    let app = authed_app();
    let token = session::issue_token("alice", SECRET + 1);

    let response = app
        .oneshot(get_with_session("/api/search?q=drama", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_header_accepted() {
    let app = authed_app();
    let token = session::issue_token("alice", SECRET);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/search?q=drama")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_auth_disabled_with_zero_secret() {
    // shared_secret = 0 disables auth checking entirely
    let app = test_app(vec![
        Arc::new(MockSource::new("alpha").with_items(&["a1"])) as Arc<dyn SourceQuery>,
    ]);

    let response = app.oneshot(get("/api/search?q=drama")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Search Aggregation Tests
// =============================================================================

#[tokio::test]
async fn test_search_merges_in_source_order() {
    // B fails, C answers before A; merged order must stay A then C
    let sources: Vec<Arc<dyn SourceQuery>> = vec![
        Arc::new(
            MockSource::new("a")
                .with_items(&["x", "y"])
                .with_delay(Duration::from_millis(30)),
        ),
        Arc::new(MockSource::new("b").failing()),
        Arc::new(MockSource::new("c").with_items(&["z"])),
    ];
    let app = test_app(sources);

    let response = app.oneshot(get("/api/search?q=drama")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(result_titles(&body), vec!["x", "y", "z"]);
}

#[tokio::test]
async fn test_search_timeout_excludes_slow_source() {
    // Per-source budget in test_config is 200ms
    let sources: Vec<Arc<dyn SourceQuery>> = vec![
        Arc::new(MockSource::new("a").with_items(&["x"])),
        Arc::new(
            MockSource::new("slow")
                .with_items(&["never"])
                .with_delay(Duration::from_millis(600)),
        ),
    ];
    let app = test_app(sources);

    let response = app.oneshot(get("/api/search?q=drama")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(result_titles(&body), vec!["x"]);
}

#[tokio::test]
async fn test_search_all_sources_failing_yields_empty_ok() {
    let sources: Vec<Arc<dyn SourceQuery>> = vec![
        Arc::new(MockSource::new("a").failing()),
        Arc::new(MockSource::new("b").failing()),
    ];
    let app = test_app(sources);

    let response = app.oneshot(get("/api/search?q=drama")).await.unwrap();
    // Partial (here: total) source failure is never an error to the caller
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(result_titles(&body).is_empty());
}

#[tokio::test]
async fn test_empty_query_returns_empty_results() {
    let app = test_app(vec![
        Arc::new(MockSource::new("alpha").with_items(&["a1"])) as Arc<dyn SourceQuery>,
    ]);

    let response = app.oneshot(get("/api/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("cache-control"));

    let body = extract_json(response.into_body()).await;
    assert!(result_titles(&body).is_empty());
}

#[tokio::test]
async fn test_search_source_key_bypasses_fanout() {
    let alpha = MockSource::new("alpha").with_items(&["a1"]);
    let beta = MockSource::new("beta").with_items(&["b1"]);
    let alpha_calls = alpha.call_log();
    let beta_calls = beta.call_log();

    let sources: Vec<Arc<dyn SourceQuery>> = vec![Arc::new(alpha), Arc::new(beta)];
    let app = test_app(sources);

    let response = app.oneshot(get("/api/search?q=beta")).await.unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(result_titles(&body), vec!["b1"]);
    assert!(alpha_calls.lock().unwrap().is_empty());
    // Exactly one call to the named source, with an empty term
    assert_eq!(*beta_calls.lock().unwrap(), vec![(String::new(), 1)]);
}

#[tokio::test]
async fn test_search_page_forwarded_to_sources() {
    let alpha = MockSource::new("alpha").with_items(&["a1"]);
    let calls = alpha.call_log();
    let app = test_app(vec![Arc::new(alpha) as Arc<dyn SourceQuery>]);

    app.oneshot(get("/api/search?q=drama&page=3")).await.unwrap();
    assert_eq!(*calls.lock().unwrap(), vec![("drama".to_string(), 3)]);
}

#[tokio::test]
async fn test_search_filters_blocked_categories() {
    let mut blocked = item("a", "hidden");
    blocked.category = "伦理片".to_string();
    let kept = item("a", "kept");

    struct FixedSource(Vec<mcb_common::ContentItem>);

    #[async_trait::async_trait]
    impl SourceQuery for FixedSource {
        fn key(&self) -> &str {
            "fixed"
        }
        fn name(&self) -> &str {
            "Fixed"
        }
        async fn query(
            &self,
            _term: &str,
            _page: u32,
        ) -> Result<Vec<mcb_common::ContentItem>, mcb_ui::sources::SourceError> {
            Ok(self.0.clone())
        }
    }

    let config = Config {
        filter: FilterConfig {
            enabled: true,
            blocked_categories: vec!["伦理".to_string()],
        },
        ..test_config()
    };
    let sources: Vec<Arc<dyn SourceQuery>> = vec![Arc::new(FixedSource(vec![kept, blocked]))];
    let app = build_router(test_state(sources, config, 0));

    let response = app.oneshot(get("/api/search?q=drama")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(result_titles(&body), vec!["kept"]);
}

// =============================================================================
// Cache Header Pass-Through
// =============================================================================

#[tokio::test]
async fn test_search_carries_configured_cache_headers() {
    let config = Config {
        cache_max_age_secs: 120,
        ..test_config()
    };
    let sources: Vec<Arc<dyn SourceQuery>> =
        vec![Arc::new(MockSource::new("alpha").with_items(&["a1"]))];
    let app = build_router(test_state(sources, config, 0));

    let response = app.oneshot(get("/api/search?q=drama")).await.unwrap();

    let cache_control = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(cache_control, "public, max-age=120, s-maxage=120");
    assert!(response.headers().contains_key("cdn-cache-control"));
}
