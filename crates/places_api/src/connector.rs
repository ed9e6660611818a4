use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use log::debug;

use crate::types::{ChargerStatus, ConnectorAggregation, PlaceDetailsResponse};

/// Display format for availability update times, e.g. `3:45 PM`
pub const DISPLAY_TIME_FORMAT: &str = "%-I:%M %p";

/// Timestamp layout accepted when the upstream value carries no offset
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Pick the connector class with the lowest charge rate.
///
/// A missing rate counts as 0 kW. When several classes share the minimum, the
/// first one in response order wins.
pub fn select_slowest_connector(
    connectors: &[ConnectorAggregation],
) -> Option<&ConnectorAggregation> {
    connectors.iter().fold(None, |slowest, candidate| match slowest {
        Some(current)
            if current
                .charge_rate_or_zero()
                .total_cmp(&candidate.charge_rate_or_zero())
                .is_le() =>
        {
            Some(current)
        }
        _ => Some(candidate),
    })
}

impl ChargerStatus {
    /// Derive the charger status from a place details response
    pub fn from_response(response: &PlaceDetailsResponse) -> Self {
        let connectors = response
            .ev_charge_options
            .as_ref()
            .and_then(|options| options.connector_aggregation.as_deref())
            .unwrap_or_default();

        match select_slowest_connector(connectors) {
            Some(connector) => Self::from_connector(connector),
            None => {
                debug!("No connector aggregation in response");
                Self::no_data()
            }
        }
    }

    /// Derive the charger status from the selected connector class
    pub fn from_connector(connector: &ConnectorAggregation) -> Self {
        let available_count = connector.available_count.unwrap_or(0);

        Self {
            available: available_count > 0,
            last_update_display: connector
                .availability_last_update_time
                .as_deref()
                .map(format_availability_time),
            available_count,
            total_count: connector.count.unwrap_or(0),
            connector_type: connector.connector_type.clone(),
            max_charge_rate_kw: connector.max_charge_rate_kw,
        }
    }
}

/// Format an upstream update timestamp as a short local time of day.
///
/// Unparsable input is returned unchanged.
pub fn format_availability_time(raw: &str) -> String {
    format_availability_time_in(raw, &Local)
}

/// Format an upstream update timestamp as a short time of day in `tz`
pub fn format_availability_time_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match parse_update_time(raw) {
        Some(timestamp) => timestamp
            .with_timezone(tz)
            .format(DISPLAY_TIME_FORMAT)
            .to_string(),
        None => {
            debug!("Unparsable availability time, showing raw value: {}", raw);
            raw.to_string()
        }
    }
}

/// Parse an upstream timestamp: RFC 3339 (fractional seconds optional) first,
/// then a bare date-time taken as UTC
fn parse_update_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
