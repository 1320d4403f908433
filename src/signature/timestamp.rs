use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Source of the current instant.
///
/// Signatures are only valid around the instant they were computed for, so
/// the clock is injectable: [`SystemClock`] in production, [`FixedClock`]
/// when a URL has to be reproducible.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct Timestamp {
    timestamp: DateTime<Utc>,
}

impl Timestamp {
    pub fn new() -> Timestamp {
        Timestamp {
            timestamp: Utc::now(),
        }
    }

    pub fn at(timestamp: DateTime<Utc>) -> Timestamp {
        Timestamp { timestamp }
    }

    pub fn from_clock(clock: &dyn Clock) -> Timestamp {
        Timestamp::at(clock.now())
    }

    /// Whole seconds since the Unix epoch. The sub-second part is dropped
    /// (truncation toward zero, also for instants before 1970).
    pub fn epoch_seconds(&self) -> i64 {
        let secs = self.timestamp.timestamp();
        if secs < 0 && self.timestamp.timestamp_subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::new()
    }
}

impl From<Option<DateTime<Utc>>> for Timestamp {
    fn from(timestamp: Option<DateTime<Utc>>) -> Self {
        timestamp.map(Timestamp::at).unwrap_or_default()
    }
}
