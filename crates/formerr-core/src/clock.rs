//! Injectable time source.

use chrono::{DateTime, Utc};

/// Source of "now". Production code uses [`SystemClock`]; tests substitute a
/// manually advanced clock to exercise expiry without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
