//! Shared helpers for mcb-ui integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use mcb_common::config::Config;
use mcb_common::ContentItem;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mcb_ui::sources::{SourceError, SourceQuery, SourceRegistry};
use mcb_ui::{build_router, AppState};

/// Scriptable source for integration tests
pub struct MockSource {
    key: String,
    name: String,
    pages: Vec<Vec<ContentItem>>,
    paged: bool,
    delay: Duration,
    fail: bool,
    calls: Arc<Mutex<Vec<(String, u32)>>>,
}

impl MockSource {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            name: key.to_uppercase(),
            pages: Vec::new(),
            paged: false,
            delay: Duration::ZERO,
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Same items for every page
    pub fn with_items(mut self, titles: &[&str]) -> Self {
        let items = titles.iter().map(|t| item(&self.key, t)).collect();
        self.pages = vec![items];
        self.paged = false;
        self
    }

    /// Scripted pages, 1-indexed; pages beyond the script are empty
    pub fn with_pages(mut self, pages: &[&[&str]]) -> Self {
        self.pages = pages
            .iter()
            .map(|titles| titles.iter().map(|t| item(&self.key, t)).collect())
            .collect();
        self.paged = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Shared call recorder, usable after the source moves into a registry
    pub fn call_log(&self) -> Arc<Mutex<Vec<(String, u32)>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl SourceQuery for MockSource {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, term: &str, page: u32) -> Result<Vec<ContentItem>, SourceError> {
        self.calls.lock().unwrap().push((term.to_string(), page));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(SourceError::Transport("mock failure".to_string()));
        }
        if !self.paged {
            // Unscripted pagination: same listing for every page
            return Ok(self.pages.first().cloned().unwrap_or_default());
        }
        Ok(self
            .pages
            .get(page.saturating_sub(1) as usize)
            .cloned()
            .unwrap_or_default())
    }
}

/// Minimal catalog item for tests
pub fn item(source_key: &str, title: &str) -> ContentItem {
    ContentItem {
        id: format!("{}-{}", source_key, title),
        title: title.to_string(),
        category: "剧情片".to_string(),
        poster: String::new(),
        year: "2024".to_string(),
        rating: String::new(),
        note: String::new(),
        source_key: source_key.to_string(),
        source_name: source_key.to_uppercase(),
    }
}

/// Config tuned for tests: short per-source budget, auth disabled
pub fn test_config() -> Config {
    Config {
        per_source_timeout_ms: 200,
        ..Config::default()
    }
}

/// App state over mock sources; shared_secret 0 disables auth
pub fn test_state(sources: Vec<Arc<dyn SourceQuery>>, config: Config, shared_secret: i64) -> AppState {
    AppState::new(config, SourceRegistry::new(sources), shared_secret)
}

/// Router over mock sources with auth disabled
pub fn test_app(sources: Vec<Arc<dyn SourceQuery>>) -> Router {
    build_router(test_state(sources, test_config(), 0))
}

/// Build a GET request
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request carrying a session cookie
pub fn get_with_session(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("cookie", format!("mcb_session={}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build a POST request with a JSON body
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Extract JSON body from a response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Titles from a `{ "results": [...] }` payload
pub fn result_titles(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}
