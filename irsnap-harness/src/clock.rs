//! Clock abstraction for report timestamps.

use chrono::{DateTime, TimeZone, Utc};

/// Timestamp format of the JSON report.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Trait for getting the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time formatted for reports.
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Real system clock implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock clock for testing with a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct MockClock {
    at: DateTime<Utc>,
}

impl MockClock {
    /// Create a mock clock fixed at `unix_sec`; out-of-range values pin it to the epoch.
    pub fn new(unix_sec: i64) -> Self {
        let at = Utc
            .timestamp_opt(unix_sec, 0)
            .single()
            .unwrap_or_default();
        Self { at }
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
