use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_ID: AtomicU32 = AtomicU32::new(1);

/// Opaque 32-bit identifier for users, devices, maps, rooms and areas.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id(u32);

impl Id {
    /// The "no user" id carried by broadcast-style device packets.
    pub const ZERO: Id = Id(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Process-unique, never zero. Used for area ids in outbound requests.
    pub fn generate() -> Self {
        loop {
            let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
            if id != 0 {
                return Self(id);
            }
        }
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
