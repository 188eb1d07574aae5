//! # Sync Metrics
//!
//! Per-unit counters for list fetches: how many were issued, how many
//! landed, how long they took.

use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncMetrics {
    pub total_fetches: u64,
    pub successful_fetches: u64,
    pub failed_fetches: u64,
    /// Responses dropped because their subscription was gone or superseded
    pub discarded_fetches: u64,
    pub average_fetch_duration: Duration,
    pub last_fetch_duration: Option<Duration>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch_start(&mut self) {
        self.total_fetches += 1;
    }

    pub fn record_fetch_success(&mut self, duration: Duration) {
        self.last_fetch_duration = Some(duration);
        self.successful_fetches += 1;

        // Update rolling average
        let count = u32::try_from(self.successful_fetches).unwrap_or(u32::MAX);
        let total_duration = self.average_fetch_duration * (count - 1) + duration;
        self.average_fetch_duration = total_duration / count;
    }

    pub fn record_fetch_failure(&mut self, duration: Duration) {
        self.last_fetch_duration = Some(duration);
        self.failed_fetches += 1;
    }

    pub fn record_discarded(&mut self) {
        self.discarded_fetches += 1;
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_fetches == 0 {
            0.0
        } else {
            self.successful_fetches as f64 / self.total_fetches as f64
        }
    }
}
