use std::time::Duration;

use agnoc_frame::{FrameConfig, MAX_BODY_SIZE};

/// Default idle window before a silent connection is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-connection behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Close the connection when no frame arrives within this window.
    pub idle_timeout: Duration,
    /// Largest accepted frame body.
    pub max_body_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_body_size: MAX_BODY_SIZE,
        }
    }
}

impl SessionConfig {
    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            max_body_size: self.max_body_size,
        }
    }
}
