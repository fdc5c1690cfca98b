//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Layout used in chat lines and the chat log, e.g. `2024-05-01 13:37:00`.
pub const CHAT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_unix_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a Unix timestamp (milliseconds) as `YYYY-MM-DD HH:MM:SS` in the local time zone.
///
/// Out-of-range timestamps fall back to the Unix epoch rather than failing,
/// since the result is only ever used for display.
pub fn format_local_datetime(timestamp_millis: i64) -> String {
    let dt: DateTime<Local> = match Local.timestamp_millis_opt(timestamp_millis) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => {
            tracing::warn!(
                "Timestamp {} is out of range, rendering the Unix epoch instead",
                timestamp_millis
            );
            DateTime::<Utc>::UNIX_EPOCH.with_timezone(&Local)
        }
    };
    dt.format(CHAT_DATETIME_FORMAT).to_string()
}
