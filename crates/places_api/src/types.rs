use serde::{Deserialize, Serialize};

/// Place details response, restricted by the field mask to EV charging data
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailsResponse {
    /// EV charging options of the place, absent for places without chargers
    pub ev_charge_options: Option<EvChargeOptions>,
}

/// EV charging block of a place
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvChargeOptions {
    /// Total number of connectors at the station
    pub connector_count: Option<u32>,
    /// One entry per connector class (type and charge rate)
    pub connector_aggregation: Option<Vec<ConnectorAggregation>>,
}

/// Aggregated availability of one connector class at a station
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorAggregation {
    /// Connector type, e.g. `EV_CONNECTOR_TYPE_J1772`
    #[serde(rename = "type")]
    pub connector_type: Option<String>,

    /// Maximum charge rate in kilowatts
    pub max_charge_rate_kw: Option<f64>,

    /// Number of connectors in this class
    pub count: Option<u32>,

    /// Number of connectors currently free
    pub available_count: Option<u32>,

    /// When the availability counts were last refreshed upstream (RFC 3339)
    pub availability_last_update_time: Option<String>,

    /// Number of connectors out of service
    pub out_of_service_count: Option<u32>,
}

impl ConnectorAggregation {
    /// Charge rate with a missing value treated as zero
    pub fn charge_rate_or_zero(&self) -> f64 {
        self.max_charge_rate_kw.unwrap_or(0.0)
    }
}

/// Availability derived from the slowest connector class of a station
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChargerStatus {
    /// Whether at least one connector of the selected class is free
    pub available: bool,
    /// Short local time of day of the last upstream update, if reported
    pub last_update_display: Option<String>,
    /// Free connectors of the selected class
    pub available_count: u32,
    /// Total connectors of the selected class
    pub total_count: u32,
    /// Type of the selected connector class
    pub connector_type: Option<String>,
    /// Charge rate of the selected connector class
    pub max_charge_rate_kw: Option<f64>,
}

impl ChargerStatus {
    /// Status reported when the place has no connector data
    pub fn no_data() -> Self {
        Self::default()
    }
}

/// Custom error type for Places API operations
#[derive(thiserror::Error, Debug)]
pub enum PlacesError {
    /// The request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport failure (connection, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limited by the Places API
    #[error("Rate limited by Places API")]
    RateLimited,

    /// The API key was rejected
    #[error("Authentication failed with Places API")]
    AuthenticationFailed,

    /// Unknown place identifier
    #[error("Place not found")]
    NotFound,

    /// Any other non-success status
    #[error("API error: {0}")]
    ApiError(String),

    /// Response body did not match the expected shape
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
