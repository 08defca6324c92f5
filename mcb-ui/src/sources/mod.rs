//! Content source descriptors and registry
//!
//! Each source is an independently operated provider reachable through the
//! [`SourceQuery`] trait. The registry holds the ordered source list built
//! once from configuration; fan-out and result merging follow that order.

pub mod provider;

use async_trait::async_trait;
use mcb_common::config::SourceConfig;
use mcb_common::ContentItem;
use std::sync::Arc;
use thiserror::Error;

/// Errors a single source query can produce.
///
/// These are absorbed by the aggregator (logged, excluded from the merge)
/// and never propagate past it.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("upstream returned status {0}")]
    Status(u16),
}

/// One queryable content source
#[async_trait]
pub trait SourceQuery: Send + Sync {
    /// Unique source key
    fn key(&self) -> &str;

    /// Human-readable name for diagnostics
    fn name(&self) -> &str;

    /// Query the provider for one page of results.
    ///
    /// An empty term requests the provider's default listing.
    async fn query(&self, term: &str, page: u32) -> Result<Vec<ContentItem>, SourceError>;
}

/// Ordered collection of the sources available to the service
pub struct SourceRegistry {
    sources: Vec<Arc<dyn SourceQuery>>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<Arc<dyn SourceQuery>>) -> Self {
        Self { sources }
    }

    /// Build the registry from configuration, one provider client per entry
    pub fn from_config(configs: &[SourceConfig]) -> Self {
        let sources = configs
            .iter()
            .map(|c| Arc::new(provider::VodApiProvider::new(c)) as Arc<dyn SourceQuery>)
            .collect();
        Self { sources }
    }

    /// Ordered source list available to the given user.
    ///
    /// Every user currently sees the full list; the username parameter is
    /// the per-user scoping seam.
    pub fn sources_for(&self, _username: &str) -> Vec<Arc<dyn SourceQuery>> {
        self.sources.clone()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

// ============================================================================
// Mock Source for Testing
// ============================================================================
