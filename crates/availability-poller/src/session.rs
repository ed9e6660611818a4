use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::poller::AvailabilityPoller;
use crate::poller_types::{PollerState, RefreshOutcome};
use crate::timer::RefreshTimer;

/// Binds a poller to the lifetime of a visible UI.
///
/// Mounting refreshes once and starts the repeating timer; unmounting (or
/// dropping the session) cancels the timer.
pub struct PollerSession {
    poller: Arc<AvailabilityPoller>,
    timer: Option<RefreshTimer>,
}

impl PollerSession {
    /// Mount the UI: start the refresh timer and run the initial refresh
    pub async fn mount(poller: Arc<AvailabilityPoller>) -> Self {
        info!("Mounting availability view for {}", poller.config().place_id);

        let timer = RefreshTimer::start(poller.clone());
        poller.refresh().await;

        Self {
            poller,
            timer: Some(timer),
        }
    }

    /// Manual pull-to-refresh
    pub async fn pull_to_refresh(&self) -> RefreshOutcome {
        self.poller.refresh().await
    }

    /// Pull-to-refresh on a detached task so the caller keeps handling input
    pub fn spawn_pull_to_refresh(&self) -> JoinHandle<RefreshOutcome> {
        let poller = self.poller.clone();

        tokio::spawn(async move {
            let outcome = poller.refresh().await;
            debug!("Manual refresh: {:?}", outcome);
            outcome
        })
    }

    /// State to display
    pub async fn state(&self) -> PollerState {
        self.poller.state().await
    }

    /// Underlying poller
    pub fn poller(&self) -> &Arc<AvailabilityPoller> {
        &self.poller
    }

    /// Whether the refresh timer is active
    pub fn is_timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(RefreshTimer::is_running)
    }

    /// Tear the UI down and cancel the refresh timer
    pub async fn unmount(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop().await;
        }
        info!("Availability view unmounted");
    }
}
