//! Multi-source fan-out aggregation
//!
//! One logical query fans out to every source concurrently. Each call races
//! an individual timeout; the aggregation waits for all races to settle,
//! keeps the successes and logs the rest. Merged output order is always the
//! source-declaration order, never the completion order.

use futures::future::join_all;
use mcb_common::ContentItem;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::filter::ContentFilter;
use crate::sources::{SourceError, SourceQuery};

/// One aggregation: a query term fanned out to an ordered source list.
///
/// Constructed per incoming query and consumed by [`Aggregator::run`].
pub struct AggregationRequest {
    /// Free-text search term, or a source key for direct browse
    pub term: String,
    /// 1-indexed result page requested from every source
    pub page: u32,
    /// Ordered sources; merged output follows this order
    pub sources: Vec<Arc<dyn SourceQuery>>,
    /// Budget for each individual source call
    pub per_source_timeout: Duration,
}

/// Merged result of one aggregation
#[derive(Debug, Default)]
pub struct AggregationResult {
    pub items: Vec<ContentItem>,
}

/// Fan-out aggregator with a content filter applied to merged results
pub struct Aggregator {
    filter: ContentFilter,
}

impl Aggregator {
    pub fn new(filter: ContentFilter) -> Self {
        Self { filter }
    }

    /// Run one aggregation.
    ///
    /// Never fails as a whole: individual source failures and timeouts are
    /// absorbed, and an empty result is a valid outcome. One slow or failing
    /// source never blocks or discards another source's success, but the
    /// aggregation does wait for the slowest source up to its timeout bound.
    pub async fn run(&self, request: AggregationRequest) -> AggregationResult {
        let fetch_id = Uuid::new_v4();

        // A term matching a source key means "browse this one source's
        // default listing": a degenerate one-source aggregation with an
        // empty term, under the same failure-absorption and filtering rules.
        if let Some(source) = request
            .sources
            .iter()
            .find(|s| s.key() == request.term)
            .cloned()
        {
            debug!(
                fetch_id = %fetch_id,
                source = source.name(),
                "Term matches source key, direct browse"
            );
            let items = match bounded_query(&source, "", request.page, request.per_source_timeout)
                .await
            {
                Ok(items) => items,
                Err(reason) => {
                    warn!(
                        fetch_id = %fetch_id,
                        source = source.name(),
                        %reason,
                        "Direct source browse failed"
                    );
                    Vec::new()
                }
            };
            return AggregationResult {
                items: self.filter.apply(items),
            };
        }

        let races = request.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let term = request.term.clone();
            let budget = request.per_source_timeout;
            let page = request.page;
            async move {
                let outcome = bounded_query(&source, &term, page, budget).await;
                (source, outcome)
            }
        });

        // join_all settles every race and yields outcomes in source order,
        // so the merge below is ordered by declaration, not by arrival.
        let mut items = Vec::new();
        for (source, outcome) in join_all(races).await {
            match outcome {
                Ok(batch) => {
                    debug!(
                        fetch_id = %fetch_id,
                        source = source.name(),
                        count = batch.len(),
                        "Source query succeeded"
                    );
                    items.extend(batch);
                }
                Err(reason) => {
                    warn!(
                        fetch_id = %fetch_id,
                        source = source.name(),
                        %reason,
                        "Source query failed, excluded from merge"
                    );
                }
            }
        }

        AggregationResult {
            items: self.filter.apply(items),
        }
    }
}

/// Race one source call against its timeout
async fn bounded_query(
    source: &Arc<dyn SourceQuery>,
    term: &str,
    page: u32,
    budget: Duration,
) -> Result<Vec<ContentItem>, QueryFailure> {
    match timeout(budget, source.query(term, page)).await {
        Ok(Ok(items)) => Ok(items),
        Ok(Err(e)) => Err(QueryFailure::Source(e)),
        Err(_) => Err(QueryFailure::Timeout(budget)),
    }
}

/// Why one source's outcome was excluded from the merge
#[derive(Debug, Error)]
enum QueryFailure {
    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

// ============================================================================
// Tests
// ============================================================================
