use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use availability_poller::PollerConfig;
use places_api::PlacesClientConfig;
use token_notifier::DEFAULT_DEVICE_TOKEN_ENDPOINT;

/// Application configuration: compiled-in defaults, overridable from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub place_id: String,
    pub places_base_url: String,
    pub device_token_endpoint: String,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    /// Raw device token bytes, as the push platform would deliver them
    pub device_token: Option<Vec<u8>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let poller = PollerConfig::default();
        let places = PlacesClientConfig::default();

        Self {
            api_key: String::new(),
            place_id: poller.place_id,
            places_base_url: places.base_url,
            device_token_endpoint: DEFAULT_DEVICE_TOKEN_ENDPOINT.to_string(),
            refresh_interval: poller.refresh_interval,
            http_timeout: places.timeout,
            device_token: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_key = lookup("PLACES_API_KEY").context("PLACES_API_KEY must be set")?;
        if api_key.trim().is_empty() {
            bail!("PLACES_API_KEY is empty");
        }

        let device_token = match lookup("DEVICE_TOKEN") {
            Some(value) => Some(hex::decode(value.trim()).context("DEVICE_TOKEN is not valid hex")?),
            None => None,
        };

        Ok(Self {
            api_key,
            place_id: lookup("PLACE_ID").unwrap_or(defaults.place_id),
            places_base_url: lookup("PLACES_BASE_URL").unwrap_or(defaults.places_base_url),
            device_token_endpoint: lookup("DEVICE_TOKEN_ENDPOINT")
                .unwrap_or(defaults.device_token_endpoint),
            refresh_interval: parse_secs(
                "REFRESH_INTERVAL_SECS",
                lookup("REFRESH_INTERVAL_SECS"),
                defaults.refresh_interval,
            ),
            http_timeout: defaults.http_timeout,
            device_token,
        })
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            place_id: self.place_id.clone(),
            refresh_interval: self.refresh_interval,
        }
    }

    pub fn places_config(&self) -> PlacesClientConfig {
        PlacesClientConfig {
            base_url: self.places_base_url.clone(),
            timeout: self.http_timeout,
            ..Default::default()
        }
    }
}

/// Positive whole seconds; anything else falls back to `default` with a warning
fn parse_secs(key: &str, value: Option<String>, default: Duration) -> Duration {
    let Some(value) = value else {
        return default;
    };

    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            log::warn!(
                "⚠️ Ignoring {}={:?}: expected a positive number of seconds, using {:?}",
                key,
                value,
                default
            );
            default
        }
    }
}
