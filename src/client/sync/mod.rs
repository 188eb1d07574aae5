//! # Sync Units
//!
//! Building blocks shared by the alert and camera sync units.
//!
//! ## Architecture
//!
//! - **Sync State**: the loading/error/data tri-state every unit publishes
//! - **Liveness**: tickets that let late responses discover they are stale
//! - **Scheduler**: the polling timer behind auto-refresh
//! - **Metrics**: per-unit fetch counters
//!
//! ## Ordering
//!
//! Responses are applied in completion order. Two overlapping fetches of the
//! same subscription (a manual refetch racing a poll tick) resolve as "last
//! write wins"; callers that need strict ordering should disable polling
//! while a manual refetch is in flight.

pub mod metrics;
pub mod scheduler;
pub mod sync_state;

pub use metrics::SyncMetrics;
pub use scheduler::PollScheduler;
pub use sync_state::SyncState;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Identifies the subscription epoch a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks whether responses issued under a given ticket may still be applied.
///
/// `advance` starts a new epoch and makes every earlier ticket stale;
/// `dispose` makes every ticket stale for good.
#[derive(Debug, Default)]
pub struct Liveness {
    epoch: AtomicU64,
    disposed: AtomicBool,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.epoch.load(Ordering::SeqCst))
    }

    pub fn advance(&self) -> Ticket {
        Ticket(self.epoch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.is_disposed() && self.epoch.load(Ordering::SeqCst) == ticket.0
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}
