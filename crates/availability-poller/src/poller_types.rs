use std::time::Duration;

use chrono::{DateTime, Utc};
use places_api::ChargerStatus;

/// Immutable record of the station availability produced by one successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilitySnapshot {
    /// Whether a connector of the slowest class is free
    pub available: bool,
    /// Short local time of the last upstream update, if reported
    pub last_update_display: Option<String>,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
    /// Free connectors of the selected class
    pub available_count: u32,
    /// Total connectors of the selected class
    pub total_count: u32,
    /// Type of the selected connector class
    pub connector_type: Option<String>,
    /// Charge rate of the selected connector class
    pub max_charge_rate_kw: Option<f64>,
}

impl AvailabilitySnapshot {
    /// Capture a charger status at the given time
    pub fn capture(status: ChargerStatus, captured_at: DateTime<Utc>) -> Self {
        Self {
            available: status.available,
            last_update_display: status.last_update_display,
            captured_at,
            available_count: status.available_count,
            total_count: status.total_count,
            connector_type: status.connector_type,
            max_charge_rate_kw: status.max_charge_rate_kw,
        }
    }
}

/// Display state handed to the UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollerState {
    /// Latest successful snapshot, `None` until the first fetch succeeds
    pub snapshot: Option<AvailabilitySnapshot>,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// When the last refresh completed, successful or not
    pub last_refreshed: Option<DateTime<Utc>>,
    /// Error of the last refresh, cleared by the next success
    pub last_error: Option<String>,
}

impl PollerState {
    /// Availability flag, `false` until a snapshot exists
    pub fn is_available(&self) -> bool {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.available)
            .unwrap_or(false)
    }

    /// Display string of the last upstream update
    pub fn last_update_display(&self) -> Option<&str> {
        self.snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.last_update_display.as_deref())
    }
}

/// Result of one `refresh()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was published
    Updated,
    /// The fetch failed, the previous snapshot was kept
    Failed,
    /// Another fetch was in flight, nothing happened
    Skipped,
}

/// Configuration for the availability poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Place to watch
    pub place_id: String,

    /// Period of the refresh timer (default: 30 seconds)
    pub refresh_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            place_id: "ChIJlf0s_HFLtokRRa9H_ouBaLM".to_string(),
            refresh_interval: Duration::from_secs(30),
        }
    }
}
