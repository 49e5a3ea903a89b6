//! Reset granularity for the rate limit gate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time unit selecting how often the gate restores full capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
    /// Per-second rate limiting
    Second,
    /// Per-minute rate limiting
    Minute,
    /// Per-hour rate limiting
    Hour,
    /// Per-day rate limiting
    Day,
}

impl WindowUnit {
    /// Get the duration of one window of this unit.
    pub fn duration(&self) -> Duration {
        match self {
            WindowUnit::Second => Duration::from_secs(1),
            WindowUnit::Minute => Duration::from_secs(60),
            WindowUnit::Hour => Duration::from_secs(3600),
            WindowUnit::Day => Duration::from_secs(86400),
        }
    }
}

impl std::fmt::Display for WindowUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowUnit::Second => write!(f, "second"),
            WindowUnit::Minute => write!(f, "minute"),
            WindowUnit::Hour => write!(f, "hour"),
            WindowUnit::Day => write!(f, "day"),
        }
    }
}
