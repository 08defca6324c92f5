//! VOD list API provider
//!
//! Speaks the conventional `?ac=videolist` JSON API exposed by hosted CMS
//! installations: `GET {api_url}?ac=videolist&wd=<term>&pg=<page>`. Response
//! payloads vary wildly between operators, so parsing is lenient: a payload
//! without a usable result list contributes nothing, with a warn diagnostic
//! so schema drift stays visible in logs.

use async_trait::async_trait;
use mcb_common::config::SourceConfig;
use mcb_common::ContentItem;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{SourceError, SourceQuery};

/// Transport-level request timeout. The aggregator applies the configured
/// per-source budget on top of this.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent header sent to providers
const USER_AGENT: &str = concat!("MCB-UI/", env!("CARGO_PKG_VERSION"));

/// One provider client, built from a [`SourceConfig`] entry
pub struct VodApiProvider {
    key: String,
    name: String,
    api_url: String,
    http_client: Client,
}

impl VodApiProvider {
    pub fn new(config: &SourceConfig) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        Self {
            key: config.key.clone(),
            name: config.name.clone(),
            api_url: config.api_url.clone(),
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .default_headers(headers)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl SourceQuery for VodApiProvider {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, term: &str, page: u32) -> Result<Vec<ContentItem>, SourceError> {
        debug!(source = %self.key, term, page, "Querying provider");

        let mut request = self
            .http_client
            .get(&self.api_url)
            .query(&[("ac", "videolist"), ("pg", &page.to_string())]);
        if !term.is_empty() {
            request = request.query(&[("wd", term)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let payload: VodListResponse = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    source = %self.key,
                    error = %e,
                    "Unparseable provider response, treating as empty"
                );
                return Ok(Vec::new());
            }
        };

        let Some(list) = payload.list else {
            warn!(
                source = %self.key,
                "Provider response missing result list, treating as empty"
            );
            return Ok(Vec::new());
        };

        let items: Vec<ContentItem> = list
            .into_iter()
            .map(|entry| entry.into_item(&self.key, &self.name))
            .collect();

        debug!(source = %self.key, count = items.len(), "Provider query complete");
        Ok(items)
    }
}

// ============================================================================
// Provider API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct VodListResponse {
    #[serde(default)]
    list: Option<Vec<VodEntry>>,
}

#[derive(Debug, Deserialize)]
struct VodEntry {
    // Providers disagree on whether ids and scores are numbers or strings
    #[serde(default)]
    vod_id: Option<Value>,
    #[serde(default)]
    vod_name: String,
    #[serde(default)]
    type_name: String,
    #[serde(default)]
    vod_pic: String,
    #[serde(default)]
    vod_year: String,
    #[serde(default)]
    vod_score: Option<Value>,
    #[serde(default)]
    vod_remarks: String,
}

impl VodEntry {
    fn into_item(self, source_key: &str, source_name: &str) -> ContentItem {
        ContentItem {
            id: self.vod_id.as_ref().map(scalar_to_string).unwrap_or_default(),
            title: self.vod_name,
            category: self.type_name,
            poster: self.vod_pic,
            year: self.vod_year,
            rating: self
                .vod_score
                .as_ref()
                .map(scalar_to_string)
                .unwrap_or_default(),
            note: self.vod_remarks,
            source_key: source_key.to_string(),
            source_name: source_name.to_string(),
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
