use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::poller::AvailabilityPoller;

/// Repeating refresh timer bound to a poller.
///
/// The first tick fires one period after start. Each tick spawns a refresh so
/// that stopping the timer never cancels a fetch already in flight. Once
/// `stop()` returns (or the timer is dropped) no tick starts another refresh.
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,

    /// Set on stop; tick tasks claim the single-flight flag under this lock
    cancelled: Arc<Mutex<bool>>,
}

impl RefreshTimer {
    /// Start ticking every `refresh_interval` of the poller's configuration
    pub fn start(poller: Arc<AvailabilityPoller>) -> Self {
        let period = poller.config().refresh_interval;
        info!("Starting refresh timer every {:?}", period);

        let cancelled = Arc::new(Mutex::new(false));
        let tick_cancelled = cancelled.clone();

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticks.tick().await;
                debug!("Refresh timer fired");

                let poller = poller.clone();
                let cancelled = tick_cancelled.clone();
                tokio::spawn(async move {
                    let guard = {
                        let cancelled = cancelled.lock().unwrap_or_else(PoisonError::into_inner);
                        if *cancelled {
                            debug!("Refresh timer stopped, dropping tick");
                            return;
                        }
                        poller.try_begin_refresh()
                    };

                    match guard {
                        Some(guard) => {
                            poller.run_refresh(guard).await;
                        }
                        None => debug!("Refresh already in progress, skipping"),
                    }
                });
            }
        });

        Self {
            handle: Some(handle),
            cancelled,
        }
    }

    /// Whether the timer task is still scheduled
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the timer and wait until its task has exited
    pub async fn stop(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            info!("Refresh timer stopped");
        }
    }

    /// Block pending ticks from starting a refresh
    fn cancel(&self) {
        *self.cancelled.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
