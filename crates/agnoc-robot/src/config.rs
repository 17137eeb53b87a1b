use std::time::Duration;

pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MODE_CHANGE_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Robot session behavior.
#[derive(Debug, Clone)]
pub struct RobotConfig {
    /// Bound on every awaited response. `None` waits until the session loses
    /// its last connection.
    pub response_timeout: Option<Duration>,
    /// How long a composite command waits for the device to report the
    /// requested mode.
    pub mode_change_timeout: Duration,
    /// Buffer of the observer broadcast channel.
    pub event_capacity: usize,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            response_timeout: Some(DEFAULT_RESPONSE_TIMEOUT),
            mode_change_timeout: DEFAULT_MODE_CHANGE_TIMEOUT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
