//! Location stream: providers and the updates service.
//!
//! A [`LocationProvider`] produces raw fixes once updates have been requested.
//! [`LocationUpdates`] owns the running stream, turning each fix into a
//! `NewLocationDetected` dispatch and the caller's start/stop intent into
//! `StartStopUpdating` dispatches.
//!
//! # Modules
//!
//! - [`provider`]: Provider trait, request parameters and the replay provider
//! - [`service`]: Start/stop lifecycle of the location stream

pub mod provider;
pub mod service;

pub use provider::{LocationProvider, LocationRequest, Priority, ReplayLocationProvider};
pub use service::LocationUpdates;
