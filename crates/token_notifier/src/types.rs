use serde::Serialize;
use validator::Validate;

/// Errors raised while submitting a device token.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// The token failed validation.
    #[error("Invalid device token: {0}")]
    InvalidToken(String),

    /// The backend endpoint is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be serialized.
    #[error("Error serializing JSON: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Transport failure.
    #[error("Error sending token to server: {0}")]
    Network(String),

    /// The backend answered with something other than 200.
    #[error("Server returned status code: {status}")]
    UnexpectedStatus {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body, for logging.
        body: String,
    },

    /// HTTP client could not be built.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<validator::ValidationErrors> for NotifierError {
    fn from(errors: validator::ValidationErrors) -> Self {
        NotifierError::InvalidToken(errors.to_string())
    }
}

/// Body posted to the device token endpoint.
#[derive(Debug, Serialize, Validate)]
pub struct DeviceTokenRequest {
    /// Lowercase hex device token.
    #[validate(length(min = 1, message = "device_token is required"))]
    pub device_token: String,
}

impl DeviceTokenRequest {
    /// Wrap a token.
    pub fn new(device_token: impl Into<String>) -> Self {
        Self {
            device_token: device_token.into(),
        }
    }

    /// Validate the token and serialize the request body.
    pub fn to_body(&self) -> Result<Vec<u8>, NotifierError> {
        self.validate()?;
        Ok(serde_json::to_vec(self)?)
    }
}

/// Lowercase hex rendering of the raw token bytes delivered by the platform.
pub fn device_token_hex(raw: &[u8]) -> String {
    hex::encode(raw)
}
