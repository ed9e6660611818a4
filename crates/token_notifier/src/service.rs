use std::fmt::Display;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url, header::CONTENT_TYPE};
use tokio::task::JoinHandle;

use crate::types::*;

/// Backend endpoint receiving device tokens.
pub const DEFAULT_DEVICE_TOKEN_ENDPOINT: &str = "http://localhost:5121/api/device-token";

/// Sends platform-issued device tokens to the backend.
#[derive(Debug, Clone)]
pub struct TokenNotifier {
    client: Client,
    endpoint: String,
}

impl TokenNotifier {
    /// Creates a notifier posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, NotifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifierError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint tokens are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `{"device_token": token}` to the backend and checks for HTTP 200.
    pub async fn submit_token(&self, token: &str) -> Result<(), NotifierError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| NotifierError::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;
        let body = DeviceTokenRequest::new(token).to_body()?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotifierError::Network(e.to_string()))?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Failed to read server response: {}", e);
                String::new()
            }
        };
        log::debug!("Server response: {}", body);

        if status != StatusCode::OK {
            return Err(NotifierError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Submits the token on a detached task; the outcome is only logged.
    pub fn spawn_submit(&self, token: String) -> JoinHandle<()> {
        let notifier = self.clone();

        tokio::spawn(async move {
            match notifier.submit_token(&token).await {
                Ok(()) => log::info!("✅ Device token successfully sent to server"),
                Err(NotifierError::UnexpectedStatus { status, body }) => {
                    log::warn!("❌ Server returned status code {}: {}", status, body)
                }
                Err(e) => log::error!("❌ Failed to submit device token: {}", e),
            }
        })
    }

    /// Platform callback: a device token was issued.
    pub fn on_registered(&self, raw_token: &[u8]) -> JoinHandle<()> {
        let token = device_token_hex(raw_token);
        log::info!("📱 Device token: {}", token);
        self.spawn_submit(token)
    }

    /// Platform callback: registration for remote notifications failed.
    pub fn on_registration_failed(&self, reason: impl Display) {
        log::warn!("Failed to register for remote notifications: {}", reason);
    }
}
