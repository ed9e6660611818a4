//! Scripted connector sources for poller tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use places_api::{ChargerStatus, PlacesError};
use tokio::sync::Notify;

use crate::ConnectorSource;

pub fn status(available: bool, last_update_display: Option<&str>) -> ChargerStatus {
    ChargerStatus {
        available,
        last_update_display: last_update_display.map(str::to_string),
        available_count: if available { 1 } else { 0 },
        total_count: 2,
        connector_type: Some("EV_CONNECTOR_TYPE_J1772".to_string()),
        max_charge_rate_kw: Some(6.5),
    }
}

/// Replays queued results, then reports no data
pub struct ScriptedSource {
    results: Mutex<VecDeque<Result<ChargerStatus, PlacesError>>>,
    place_ids: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new(results: Vec<Result<ChargerStatus, PlacesError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            place_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn place_ids(&self) -> Vec<String> {
        self.place_ids.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.place_ids.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ConnectorSource for ScriptedSource {
    async fn fetch_connector_data(&self, place_id: &str) -> Result<ChargerStatus, PlacesError> {
        self.place_ids.lock().unwrap().push(place_id.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ChargerStatus::no_data()))
    }
}

/// Blocks every fetch until released
pub struct GatedSource {
    calls: AtomicUsize,
    pub started: Notify,
    pub release: Notify,
}

impl GatedSource {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ConnectorSource for GatedSource {
    async fn fetch_connector_data(&self, _place_id: &str) -> Result<ChargerStatus, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        Ok(status(true, None))
    }
}
