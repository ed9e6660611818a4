//! # Token Notifier
//!
//! This crate forwards the push-notification device token issued by the platform
//! to the backend. Submission is fire-and-forget: outcomes are logged and never
//! retried.

/// Service for submitting device tokens to the backend.
pub mod service;
/// Request types and errors used by the notifier.
pub mod types;

pub use service::{DEFAULT_DEVICE_TOKEN_ENDPOINT, TokenNotifier};
pub use types::{DeviceTokenRequest, NotifierError, device_token_hex};
