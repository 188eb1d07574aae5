//! Alerts Sync
//!
//! Keeps a page of alerts in sync with the backend: fetches on observe,
//! maps records into [`DisplayAlert`]s ordered most-recent-first and,
//! when configured, polls on a fixed interval.
//!
//! ```rust,no_run
//! use salama::client::{AlertsQuery, AlertsSync, ApiClient, Config};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), salama::shared::ApiError> {
//! let api = ApiClient::new(Config::new())?;
//! let query = AlertsQuery::new(5, 0).with_refresh_interval(Duration::from_secs(30));
//! let alerts = AlertsSync::observe(api, query);
//!
//! let mut updates = alerts.subscribe();
//! updates.changed().await.ok();
//! println!("{} alerts", updates.borrow().data.len());
//! # Ok(())
//! # }
//! ```

use crate::client::api::ApiClient;
use crate::client::config::Config;
use crate::client::sync::{Liveness, PollScheduler, SyncMetrics, SyncState, Ticket};
use crate::shared::alert::{to_display_alerts, DisplayAlert};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub type AlertsState = SyncState<Vec<DisplayAlert>>;

/// Which page of alerts to keep in sync, and how often to refresh it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertsQuery {
    /// Max records per fetch
    pub limit: u32,
    /// Pagination offset
    pub skip: u32,
    /// `None` disables polling
    pub refresh_interval: Option<Duration>,
}

impl AlertsQuery {
    pub fn new(limit: u32, skip: u32) -> Self {
        Self {
            limit,
            skip,
            refresh_interval: None,
        }
    }

    /// A zero interval disables polling
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            limit: config.alerts_page_size(),
            skip: 0,
            refresh_interval: config.alerts_refresh_interval(),
        }
    }
}

impl Default for AlertsQuery {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

struct AlertsInner {
    api: ApiClient,
    state: watch::Sender<AlertsState>,
    liveness: Liveness,
    metrics: Mutex<SyncMetrics>,
}

impl AlertsInner {
    fn metrics(&self) -> MutexGuard<'_, SyncMetrics> {
        self.metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `update` only while `ticket` is still current. The liveness
    /// check runs under the channel lock so it cannot interleave with
    /// `dispose`.
    fn publish(&self, ticket: Ticket, update: impl FnOnce(&mut AlertsState)) -> bool {
        self.state.send_if_modified(|state| {
            if !self.liveness.is_current(ticket) {
                return false;
            }
            update(state);
            true
        })
    }
}

/// Alerts sync unit.
///
/// Must be created inside a Tokio runtime. Dropping it disposes it.
pub struct AlertsSync {
    inner: Arc<AlertsInner>,
    query: AlertsQuery,
    poller: Option<PollScheduler>,
}

impl AlertsSync {
    /// Start observing `query`: issues the initial fetch and, if
    /// configured, starts polling.
    pub fn observe(api: ApiClient, query: AlertsQuery) -> Self {
        let (state, _) = watch::channel(AlertsState::default());
        let inner = Arc::new(AlertsInner {
            api,
            state,
            liveness: Liveness::new(),
            metrics: Mutex::new(SyncMetrics::new()),
        });
        let mut sync = Self {
            inner,
            query,
            poller: None,
        };
        sync.start();
        sync
    }

    fn start(&mut self) {
        let ticket = self.inner.liveness.ticket();
        tokio::spawn(fetch_alerts(Arc::clone(&self.inner), self.query, ticket));

        if let Some(interval) = self.query.refresh_interval {
            let inner = Arc::clone(&self.inner);
            let query = self.query;
            self.poller = Some(PollScheduler::start(interval, move || {
                fetch_alerts(Arc::clone(&inner), query, ticket)
            }));
        }
    }

    /// Change the page or refresh interval: cancels the pending timer,
    /// drops responses still in flight for the old query and fetches again.
    pub fn set_query(&mut self, query: AlertsQuery) {
        if self.inner.liveness.is_disposed() {
            return;
        }
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
        self.inner.liveness.advance();
        self.query = query;
        self.start();
    }

    /// Fetch immediately. Does not touch the polling timer.
    pub async fn refetch(&self) {
        let ticket = self.inner.liveness.ticket();
        fetch_alerts(Arc::clone(&self.inner), self.query, ticket).await;
    }

    pub fn query(&self) -> AlertsQuery {
        self.query
    }

    pub fn state(&self) -> AlertsState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AlertsState> {
        self.inner.state.subscribe()
    }

    /// Stream of published states, starting with the current one
    pub fn updates(&self) -> WatchStream<AlertsState> {
        WatchStream::new(self.subscribe())
    }

    pub fn metrics(&self) -> SyncMetrics {
        self.inner.metrics().clone()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(PollScheduler::is_running)
    }

    /// Stop polling and ignore every response still in flight
    pub fn dispose(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
        let inner = &self.inner;
        inner.state.send_if_modified(|_| {
            inner.liveness.dispose();
            false
        });
    }
}

impl Drop for AlertsSync {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn fetch_alerts(inner: Arc<AlertsInner>, query: AlertsQuery, ticket: Ticket) {
    if !inner.publish(ticket, SyncState::begin) {
        return;
    }
    inner.metrics().record_fetch_start();
    let started = Instant::now();

    let result = inner.api.list_alerts(query.skip, query.limit).await;
    let elapsed = started.elapsed();

    match result {
        Ok(records) => {
            let alerts = to_display_alerts(records, Utc::now());
            let count = alerts.len();
            if inner.publish(ticket, |state| {
                state.succeed(alerts);
            }) {
                inner.metrics().record_fetch_success(elapsed);
                tracing::debug!(count, skip = query.skip, limit = query.limit, "alerts refreshed");
            } else {
                inner.metrics().record_discarded();
                tracing::debug!("discarding alerts response for a stale subscription");
            }
        }
        Err(err) => {
            let message = format!("Failed to fetch alerts. {}", err.user_message());
            if inner.publish(ticket, |state| state.fail(message)) {
                inner.metrics().record_fetch_failure(elapsed);
                tracing::warn!(error = %err, "failed to fetch alerts");
            } else {
                inner.metrics().record_discarded();
            }
        }
    }
}
