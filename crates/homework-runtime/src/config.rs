//! Runtime configuration.

use std::time::Duration;

/// Seconds in the default lookback window (30 days).
const DEFAULT_LOOKBACK_SECS: u64 = 30 * 24 * 3600;

/// Configuration for the status poller.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Wait between two polls.
    pub poll_interval: Duration,
    /// How far back the first query reaches.
    pub lookback: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(600),
            lookback: Duration::from_secs(DEFAULT_LOOKBACK_SECS),
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the lookback window.
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }
}
