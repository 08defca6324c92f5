//! Stale-response guarding for parameter-driven fetches
//!
//! Any asynchronous fetch dispatched on behalf of user-adjustable parameters
//! captures a by-value snapshot of those parameters. When the fetch
//! completes, its result may be committed only if the live parameters still
//! equal the snapshot. This is not cancellation: in-flight work keeps
//! running, but a completion whose snapshot no longer matches is dropped
//! without any state change, so visible state always reflects the most
//! recently requested parameters regardless of completion order.

use uuid::Uuid;

/// Snapshot of fetch parameters captured at dispatch time
#[derive(Debug, Clone)]
pub struct FetchGuard<P: Clone + PartialEq> {
    id: Uuid,
    snapshot: P,
}

impl<P: Clone + PartialEq> FetchGuard<P> {
    /// Capture the live parameters at dispatch time
    pub fn capture(live: &P) -> Self {
        Self {
            id: Uuid::new_v4(),
            snapshot: live.clone(),
        }
    }

    /// Correlation id for diagnostics
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Parameters as captured at dispatch
    pub fn snapshot(&self) -> &P {
        &self.snapshot
    }

    /// Whether the captured snapshot still equals the live parameters.
    ///
    /// Comparison is by value across every field: two independently
    /// constructed parameter sets with equal contents compare equal.
    pub fn is_current(&self, live: &P) -> bool {
        self.snapshot == *live
    }
}
