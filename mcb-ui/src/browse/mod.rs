//! Browse-surface state: selection parameters, display state, and the
//! pagination accumulator.
//!
//! The accumulator is a plain state machine; it performs no I/O itself.
//! Dispatching a page yields a [`FetchGuard`] snapshot, and a completed
//! fetch is offered back through [`BrowseSession::complete`], which commits
//! only if the snapshot still matches the live parameters. The controller
//! submodule wires this to actual fetches.

pub mod controller;

use mcb_common::ContentItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::guard::FetchGuard;

/// Top-level catalog listing kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    #[default]
    Movie,
    Tv,
    /// Weekly schedule listing, served from pre-fetched calendar data
    Calendar,
    /// Operator-defined category whose query may name a source key
    Custom,
}

/// Complete set of user-adjustable selection parameters.
///
/// Equality is structural across every field, deep through `extra`; the
/// stale-response guard relies on exactly this comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseParams {
    pub kind: CatalogKind,
    pub category: String,
    pub subcategory: String,
    /// Weekday filter for the calendar listing ("mon".."sun", empty = all)
    pub weekday: String,
    /// Additional filter selections keyed by filter name
    pub extra: BTreeMap<String, String>,
}

/// Selection parameters plus the page index: the full snapshot a dispatched
/// fetch is guarded by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub params: BrowseParams,
    pub page: u32,
}

/// What the browsing surface renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayState {
    pub items: Vec<ContentItem>,
    pub has_more: bool,
    pub loading: bool,
}

/// Accumulator phases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowsePhase {
    #[default]
    Idle,
    /// Initial page in flight
    Loading,
    /// At least one page committed, more may be available
    Ready,
    /// Follow-up page in flight
    LoadingMore,
    /// A committed page came back empty; only a parameter change restarts
    Exhausted,
}

/// Outcome of offering a completed fetch to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// Snapshot no longer matches the live parameters; nothing changed
    Stale,
}

/// Pagination accumulator.
///
/// Owns the display state for one browsing surface and accepts completed
/// fetches only while their snapshot matches the live parameters. A stale
/// completion leaves the session exactly as if it never happened.
#[derive(Debug)]
pub struct BrowseSession {
    params: BrowseParams,
    page: u32,
    phase: BrowsePhase,
    state: DisplayState,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self {
            params: BrowseParams::default(),
            page: 1,
            phase: BrowsePhase::Idle,
            state: DisplayState::default(),
        }
    }

    pub fn phase(&self) -> BrowsePhase {
        self.phase
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn params(&self) -> &BrowseParams {
        &self.params
    }

    /// Replace the selection parameters.
    ///
    /// Any parameter change resets the accumulator: items and has_more are
    /// cleared and the page index restarts. In-flight fetches dispatched for
    /// the previous selection become stale by snapshot comparison.
    pub fn select(&mut self, params: BrowseParams) {
        self.params = params;
        self.page = 1;
        self.phase = BrowsePhase::Idle;
        self.state = DisplayState::default();
    }

    /// Dispatch the initial page, returning the guard for the fetch
    pub fn begin_initial(&mut self) -> FetchGuard<PageQuery> {
        self.page = 1;
        self.phase = BrowsePhase::Loading;
        self.state.loading = true;
        FetchGuard::capture(&self.live_query())
    }

    /// Dispatch the next page if the session is ready and more may exist
    pub fn begin_more(&mut self) -> Option<FetchGuard<PageQuery>> {
        if self.phase != BrowsePhase::Ready || !self.state.has_more {
            return None;
        }
        self.page += 1;
        self.phase = BrowsePhase::LoadingMore;
        self.state.loading = true;
        Some(FetchGuard::capture(&self.live_query()))
    }

    /// Offer a completed fetch.
    ///
    /// Commits only when the guard still matches the live parameters and a
    /// page is actually outstanding; anything else is reported stale and
    /// changes nothing. An empty committed page exhausts the session.
    pub fn complete(
        &mut self,
        guard: &FetchGuard<PageQuery>,
        items: Vec<ContentItem>,
    ) -> CommitOutcome {
        if !guard.is_current(&self.live_query()) {
            return CommitOutcome::Stale;
        }

        match self.phase {
            BrowsePhase::Loading => {
                self.state.loading = false;
                if items.is_empty() {
                    self.state.has_more = false;
                    self.phase = BrowsePhase::Exhausted;
                } else {
                    self.state.items = items;
                    self.state.has_more = true;
                    self.phase = BrowsePhase::Ready;
                }
                CommitOutcome::Committed
            }
            BrowsePhase::LoadingMore => {
                self.state.loading = false;
                if items.is_empty() {
                    self.state.has_more = false;
                    self.phase = BrowsePhase::Exhausted;
                } else {
                    self.state.items.extend(items);
                    self.state.has_more = true;
                    self.phase = BrowsePhase::Ready;
                }
                CommitOutcome::Committed
            }
            // No page outstanding: this completion has no dispatch to match
            _ => CommitOutcome::Stale,
        }
    }

    fn live_query(&self) -> PageQuery {
        PageQuery {
            params: self.params.clone(),
            page: self.page,
        }
    }
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
