//! Runtime configuration.

use std::time::Duration;

/// Shortest period a worker timer runs with.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Configuration for the polling runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How long a worker waits between attempts that secured nothing.
    pub poll_interval: Duration,
    /// How often each worker logs that it is still alive.
    pub heartbeat_interval: Duration,
    /// Upper bound for every remote call the runtime makes.
    pub request_timeout: Duration,
    /// Upper bound for delivering a notification.
    pub notify_timeout: Duration,
    /// Whether claimed slots are booked as online reviews.
    pub online: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(10 * 60),
            request_timeout: Duration::from_secs(30),
            notify_timeout: Duration::from_secs(10),
            online: true,
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval. Zero is raised to [`MIN_PERIOD`].
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_PERIOD);
        self
    }

    /// Sets the heartbeat interval. Zero is raised to [`MIN_PERIOD`].
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval.max(MIN_PERIOD);
        self
    }

    /// Poll period used by workers, never shorter than [`MIN_PERIOD`].
    pub fn poll_period(&self) -> Duration {
        self.poll_interval.max(MIN_PERIOD)
    }

    /// Heartbeat period used by workers, never shorter than [`MIN_PERIOD`].
    pub fn heartbeat_period(&self) -> Duration {
        self.heartbeat_interval.max(MIN_PERIOD)
    }

    /// Sets the per-call timeout for remote operations.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the notification timeout.
    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    /// Sets the online preference for claims.
    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }
}
