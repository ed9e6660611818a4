//! # Availability Poller
//!
//! This crate keeps the availability of one EV charging station in sync with the
//! Places API. It owns the latest availability snapshot, guards against
//! overlapping fetches and drives refreshes from mount, a repeating timer and
//! manual pull-to-refresh.

/// Types for availability state and poller configuration
mod poller_types;
pub use poller_types::*;

/// Single-flight refresh controller
mod poller;
pub use poller::*;

/// Repeating refresh timer
mod timer;
pub use timer::*;

/// UI lifecycle binding (mount, pull-to-refresh, unmount)
mod session;
pub use session::*;

#[cfg(test)]
mod test_support;
