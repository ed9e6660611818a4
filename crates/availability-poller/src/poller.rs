use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use places_api::{ChargerStatus, PlacesClient, PlacesError};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::poller_types::*;

/// Source of connector availability for a place
#[async_trait::async_trait]
pub trait ConnectorSource: Send + Sync {
    /// Fetch the availability of the slowest connector class at `place_id`
    async fn fetch_connector_data(&self, place_id: &str) -> Result<ChargerStatus, PlacesError>;
}

#[async_trait::async_trait]
impl ConnectorSource for PlacesClient {
    async fn fetch_connector_data(&self, place_id: &str) -> Result<ChargerStatus, PlacesError> {
        PlacesClient::fetch_connector_data(self, place_id).await
    }
}

/// Refresh controller owning the station availability state
pub struct AvailabilityPoller {
    source: Arc<dyn ConnectorSource>,

    /// Last published state, loading flag excluded
    state: RwLock<PollerState>,

    /// Single-flight guard, set while a fetch is in progress
    in_flight: AtomicBool,

    config: PollerConfig,
}

impl AvailabilityPoller {
    /// Create a poller reading from `source`
    pub fn new(source: Arc<dyn ConnectorSource>, config: Option<PollerConfig>) -> Self {
        Self {
            source,
            state: RwLock::new(PollerState::default()),
            in_flight: AtomicBool::new(false),
            config: config.unwrap_or_default(),
        }
    }

    /// Poller configuration
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Whether a fetch is currently in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Current display state
    pub async fn state(&self) -> PollerState {
        let mut state = self.state.read().await.clone();
        state.loading = self.is_loading();
        state
    }

    /// Fetch the station availability and publish a new snapshot.
    ///
    /// Returns immediately with [`RefreshOutcome::Skipped`] when another fetch
    /// is in flight. Failures keep the previous snapshot; the completion time
    /// is recorded either way.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(guard) = self.try_begin_refresh() else {
            debug!("Refresh already in progress, skipping");
            return RefreshOutcome::Skipped;
        };

        self.run_refresh(guard).await
    }

    /// Claim the single-flight flag, `None` if a fetch is already in flight
    pub(crate) fn try_begin_refresh(&self) -> Option<InFlightGuard<'_>> {
        InFlightGuard::acquire(&self.in_flight)
    }

    /// Fetch and publish while holding the single-flight flag
    pub(crate) async fn run_refresh(&self, _guard: InFlightGuard<'_>) -> RefreshOutcome {
        let result = self
            .source
            .fetch_connector_data(&self.config.place_id)
            .await;

        let now = Utc::now();
        let mut state = self.state.write().await;

        let outcome = match result {
            Ok(status) => {
                let snapshot = AvailabilitySnapshot::capture(status, now);
                info!(
                    "Station {} is {} ({}/{} free, last updated {})",
                    self.config.place_id,
                    if snapshot.available { "available" } else { "busy" },
                    snapshot.available_count,
                    snapshot.total_count,
                    snapshot.last_update_display.as_deref().unwrap_or("unknown")
                );
                state.snapshot = Some(snapshot);
                state.last_error = None;
                RefreshOutcome::Updated
            }
            Err(e) => {
                error!(
                    "Failed to fetch availability for {}: {}",
                    self.config.place_id, e
                );
                state.last_error = Some(e.to_string());
                RefreshOutcome::Failed
            }
        };

        state.last_refreshed = Some(now);
        outcome
    }
}

/// Holds the single-flight flag for the duration of one fetch
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
