use chrono::Utc;

/// Source of wall-clock time for nonces and request signing
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn milliseconds(&self) -> i64;

    /// Whole seconds since the Unix epoch
    fn seconds(&self) -> i64 {
        self.milliseconds().div_euclid(1000)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn milliseconds(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a given instant, for deterministic signatures in tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    millis: i64,
}

impl FixedClock {
    pub const fn new(millis: i64) -> Self {
        Self { millis }
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self {
            millis: seconds * 1000,
        }
    }
}

impl Clock for FixedClock {
    fn milliseconds(&self) -> i64 {
        self.millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_seconds_truncates() {
        assert_eq!(FixedClock::new(1_999).seconds(), 1);
        assert_eq!(FixedClock::from_seconds(1_000).milliseconds(), 1_000_000);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.milliseconds() > 1_577_836_800_000);
    }
}
