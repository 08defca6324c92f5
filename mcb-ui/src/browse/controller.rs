//! Browse session actor
//!
//! Each authenticated user gets one controller task that exclusively owns a
//! [`BrowseSession`]. HTTP handlers talk to it over a command channel, and
//! fetch tasks report completions over the same channel, so every state
//! mutation happens on the single task holding the session. Commits are
//! rejected by snapshot comparison, not synchronized by locks.

use async_trait::async_trait;
use mcb_common::ContentItem;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use super::{BrowseParams, BrowsePhase, BrowseSession, CatalogKind, CommitOutcome, PageQuery};
use crate::aggregate::{AggregationRequest, Aggregator};
use crate::calendar::Calendar;
use crate::guard::FetchGuard;
use crate::sources::SourceRegistry;

/// Fetches one page of catalog items for a selection.
///
/// Implementations absorb their own failures: a fetch yields items or
/// nothing, never an error.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, query: &PageQuery) -> Vec<ContentItem>;
}

/// Commands accepted by a browse controller
enum BrowseCommand {
    /// Replace the selection parameters and load the first page
    Select(BrowseParams),
    /// Load the next page if one may be available
    LoadMore,
    /// A dispatched fetch finished
    FetchDone {
        guard: FetchGuard<PageQuery>,
        items: Vec<ContentItem>,
    },
}

/// Session snapshot published to readers
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrowseView {
    pub phase: BrowsePhase,
    pub items: Vec<ContentItem>,
    pub has_more: bool,
    pub loading: bool,
}

/// The controller task is gone; only happens at shutdown
#[derive(Debug, Error)]
#[error("browse session is no longer running")]
pub struct SessionClosed;

/// Handle for talking to a running browse controller
#[derive(Clone)]
pub struct BrowseHandle {
    commands: mpsc::UnboundedSender<BrowseCommand>,
    state: watch::Receiver<BrowseView>,
}

impl BrowseHandle {
    pub fn select(&self, params: BrowseParams) -> Result<(), SessionClosed> {
        self.commands
            .send(BrowseCommand::Select(params))
            .map_err(|_| SessionClosed)
    }

    pub fn load_more(&self) -> Result<(), SessionClosed> {
        self.commands
            .send(BrowseCommand::LoadMore)
            .map_err(|_| SessionClosed)
    }

    /// Current published view of the session
    pub fn view(&self) -> BrowseView {
        self.state.borrow().clone()
    }
}

/// Actor owning one browse session
pub struct BrowseController {
    session: BrowseSession,
    fetcher: Arc<dyn CatalogFetcher>,
    commands: mpsc::UnboundedReceiver<BrowseCommand>,
    loopback: mpsc::UnboundedSender<BrowseCommand>,
    state_tx: watch::Sender<BrowseView>,
}

impl BrowseController {
    /// Spawn a controller task and return its handle
    pub fn spawn(fetcher: Arc<dyn CatalogFetcher>) -> BrowseHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(BrowseView::default());

        let controller = BrowseController {
            session: BrowseSession::new(),
            fetcher,
            commands: command_rx,
            loopback: command_tx.clone(),
            state_tx,
        };
        tokio::spawn(controller.run());

        BrowseHandle {
            commands: command_tx,
            state: state_rx,
        }
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                BrowseCommand::Select(params) => {
                    self.session.select(params);
                    let guard = self.session.begin_initial();
                    self.dispatch(guard);
                }
                BrowseCommand::LoadMore => {
                    if let Some(guard) = self.session.begin_more() {
                        self.dispatch(guard);
                    }
                }
                BrowseCommand::FetchDone { guard, items } => {
                    match self.session.complete(&guard, items) {
                        CommitOutcome::Committed => {
                            debug!(fetch_id = %guard.id(), "Committed fetch result")
                        }
                        CommitOutcome::Stale => {
                            debug!(fetch_id = %guard.id(), "Discarded stale fetch result")
                        }
                    }
                }
            }
            self.publish();
        }
    }

    /// Start the fetch for a dispatched page; its completion comes back as a
    /// command so the session is only ever touched from the actor task
    fn dispatch(&self, guard: FetchGuard<PageQuery>) {
        let fetcher = Arc::clone(&self.fetcher);
        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let items = fetcher.fetch(guard.snapshot()).await;
            // Receiver gone means the session shut down; drop the result
            let _ = loopback.send(BrowseCommand::FetchDone { guard, items });
        });
    }

    fn publish(&self) {
        let state = self.session.state();
        self.state_tx.send_replace(BrowseView {
            phase: self.session.phase(),
            items: state.items.clone(),
            has_more: state.has_more,
            loading: state.loading,
        });
    }
}

/// Production fetcher: calendar selections come from the pre-fetched
/// schedule, everything else goes through the fan-out aggregator.
pub struct CatalogService {
    aggregator: Arc<Aggregator>,
    calendar: Arc<Calendar>,
    registry: Arc<SourceRegistry>,
    per_source_timeout: Duration,
    username: String,
}

impl CatalogService {
    pub fn new(
        aggregator: Arc<Aggregator>,
        calendar: Arc<Calendar>,
        registry: Arc<SourceRegistry>,
        per_source_timeout: Duration,
        username: String,
    ) -> Self {
        Self {
            aggregator,
            calendar,
            registry,
            per_source_timeout,
            username,
        }
    }
}

#[async_trait]
impl CatalogFetcher for CatalogService {
    async fn fetch(&self, query: &PageQuery) -> Vec<ContentItem> {
        match query.params.kind {
            CatalogKind::Calendar => self.calendar.page(&query.params.weekday, query.page),
            _ => {
                let request = AggregationRequest {
                    term: browse_term(&query.params),
                    page: query.page,
                    sources: self.registry.sources_for(&self.username),
                    per_source_timeout: self.per_source_timeout,
                };
                self.aggregator.run(request).await.items
            }
        }
    }
}

/// Query term for a non-calendar selection: the most specific non-empty
/// selection field. A custom category's query may name a source key, which
/// the aggregator resolves as a direct single-source browse.
fn browse_term(params: &BrowseParams) -> String {
    if !params.subcategory.is_empty() {
        params.subcategory.clone()
    } else {
        params.category.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
