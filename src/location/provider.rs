//! Location providers.
//!
//! Providers follow a request/stream/remove protocol: updates are requested
//! with a [`LocationRequest`] (which may fail for lack of permission), fixes are
//! pulled with [`LocationProvider::next_fix`] until the stream ends, and updates
//! are removed when the stream is stopped.

use crate::domain::error::{LocationStreamError, Result};
use crate::domain::Location;
use crate::Config;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

/// Default interval between fixes.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(10_000);

/// Requested accuracy of fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    HighAccuracy,
    BalancedPowerAccuracy,
    LowPower,
}

/// Parameters of a location update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    /// Desired interval between fixes.
    pub interval: Duration,
    /// Fastest rate at which fixes are accepted.
    pub fastest_interval: Duration,
    pub priority: Priority,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval: DEFAULT_UPDATE_INTERVAL,
            fastest_interval: DEFAULT_UPDATE_INTERVAL / 2,
            priority: Priority::HighAccuracy,
        }
    }
}

impl LocationRequest {
    /// Builds the request from configured intervals.
    ///
    /// ```rust
    /// use locationstream::location::LocationRequest;
    /// use locationstream::Config;
    /// use std::time::Duration;
    ///
    /// let request = LocationRequest::from_config(&Config::default());
    /// assert_eq!(request.interval, Duration::from_secs(10));
    /// assert_eq!(request.fastest_interval, Duration::from_secs(5));
    /// ```
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let interval = Duration::from_millis(config.update_interval_ms);
        let fastest_interval = config
            .fastest_update_interval_ms
            .map_or(interval / 2, Duration::from_millis);

        Self {
            interval,
            fastest_interval,
            priority: config.priority,
        }
    }
}

/// Source of location fixes.
#[async_trait]
pub trait LocationProvider: Send + 'static {
    /// Starts delivering fixes according to `request`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationStreamError::PermissionDenied`] when location access
    /// has not been granted, or another error if the request fails.
    async fn request_updates(&mut self, request: &LocationRequest) -> Result<()>;

    /// Waits for the next fix. `None` means the stream has ended.
    async fn next_fix(&mut self) -> Option<Location>;

    /// Stops delivering fixes.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be stopped cleanly.
    async fn remove_updates(&mut self) -> Result<()>;
}

/// Replays a recorded list of fixes, one per update interval.
///
/// The first fix is delivered as soon as it is requested; later fixes follow
/// after the request's interval each.
#[derive(Debug, Clone)]
pub struct ReplayLocationProvider {
    fixes: VecDeque<Location>,
    interval: Duration,
    permission_granted: bool,
    requested: bool,
    delivered: usize,
}

impl ReplayLocationProvider {
    #[must_use]
    pub fn new(fixes: Vec<Location>) -> Self {
        Self {
            fixes: fixes.into(),
            interval: Duration::ZERO,
            permission_granted: true,
            requested: false,
            delivered: 0,
        }
    }

    /// Simulates the user granting or refusing location access.
    #[must_use]
    pub const fn with_permission(mut self, granted: bool) -> Self {
        self.permission_granted = granted;
        self
    }

    /// Loads fixes from a JSON-lines file.
    ///
    /// Each non-empty line holds one `{"latitude": .., "longitude": ..}` object.
    /// Lines starting with `#` are comments.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`LocationStreamError::Location`] naming the first malformed line.
    pub async fn from_json_lines(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        let fixes = parse_json_lines(&contents)?;
        tracing::debug!(path = ?path, fixes = fixes.len(), "loaded recorded fixes");
        Ok(Self::new(fixes))
    }

    /// Fixes not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }
}

fn parse_json_lines(contents: &str) -> Result<Vec<Location>> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            serde_json::from_str::<Location>(line).map_err(|e| {
                LocationStreamError::Location(format!("invalid fix on line {number}: {e}"))
            })
        })
        .collect()
}

#[async_trait]
impl LocationProvider for ReplayLocationProvider {
    async fn request_updates(&mut self, request: &LocationRequest) -> Result<()> {
        if !self.permission_granted {
            return Err(LocationStreamError::PermissionDenied(
                "location access has not been granted".to_string(),
            ));
        }

        self.interval = request.interval;
        self.requested = true;
        Ok(())
    }

    async fn next_fix(&mut self) -> Option<Location> {
        if !self.requested {
            return None;
        }
        if self.delivered > 0 && !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }

        let fix = self.fixes.pop_front()?;
        self.delivered += 1;
        Some(fix)
    }

    async fn remove_updates(&mut self) -> Result<()> {
        self.requested = false;
        Ok(())
    }
}
