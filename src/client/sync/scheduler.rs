//! # Poll Scheduler
//!
//! Fires a tick every `interval` after it is started, spawning each tick's
//! work as its own task so a slow fetch never holds back the next tick.
//! Stopping (or dropping) the scheduler cancels the timer; work that is
//! already running is left to finish and must check its own liveness.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug)]
pub struct PollScheduler {
    interval: Duration,
    timer: Option<JoinHandle<()>>,
}

impl PollScheduler {
    /// Start ticking. The first tick fires one `interval` from now.
    pub fn start<F, Fut>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let timer = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tokio::spawn(tick());
            }
        });
        tracing::debug!(?interval, "poll scheduler started");

        Self {
            interval,
            timer: Some(timer),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the timer
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            tracing::debug!(interval = ?self.interval, "poll scheduler stopped");
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
