use chrono::{DateTime, FixedOffset, Local, NaiveDate};

/// Wall-clock source shared by the ledger and the spam gate.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar date in the clock's own offset.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Deployment-local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use chrono::{DateTime, Duration, FixedOffset};
    use std::sync::Mutex;

    use super::Clock;

    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<DateTime<FixedOffset>>,
    }

    impl ManualClock {
        /// Starts the clock at an RFC 3339 timestamp, e.g. `2026-10-18T23:59:58+05:00`.
        pub fn at(rfc3339: &str) -> Self {
            Self {
                now: Mutex::new(DateTime::parse_from_rfc3339(rfc3339).unwrap()),
            }
        }

        pub fn set(&self, rfc3339: &str) {
            *self.now.lock().unwrap() = DateTime::parse_from_rfc3339(rfc3339).unwrap();
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<FixedOffset> {
            *self.now.lock().unwrap()
        }
    }
}
