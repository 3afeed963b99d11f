//! Configuration for the sync controller.

use std::time::Duration;

/// Configuration for sync cycles.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Retry behavior for the fetch phase.
    pub retry: RetryConfig,
    /// Interval between periodic sync triggers.
    pub sync_interval: Duration,
}

impl SyncConfig {
    /// Creates the default configuration: 3 fetch attempts with a fixed
    /// 2-second pause, periodic sync every 30 seconds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            retry: RetryConfig::default(),
            sync_interval: Duration::from_secs(30),
        }
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the periodic sync interval.
    #[must_use]
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for retry behavior.
///
/// The fetch phase pauses for a fixed `delay` between attempts; there is
/// no exponential backoff and no jitter.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of fetch attempts per cycle.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl RetryConfig {
    /// Creates a retry configuration with the given attempt budget.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::from_secs(2),
        }
    }

    /// Creates a configuration with a single attempt and no pause.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Sets the pause between attempts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}
