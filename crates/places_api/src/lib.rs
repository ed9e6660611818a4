//! # Places API
//!
//! This crate provides a client for the Google Places API (New), used to read the
//! live availability of the EV charging connectors at a single place.

/// Response models and error types for the Places API.
mod types;
pub use types::*;

/// Connector selection and availability time formatting.
mod connector;
pub use connector::*;

/// HTTP client for the place details endpoint.
mod client;
pub use client::*;
