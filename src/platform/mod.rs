//! Platform abstraction layer
//!
//! The simulation never reads the clock itself; drivers sample it here and
//! pass the value in through `TickInput::now_millis`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch (0 if the system clock is before it)
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
