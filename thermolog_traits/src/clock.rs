use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds between the Unix epoch and 2000-01-01T00:00:00Z, the zero point used
/// by the logging device.
pub const DEVICE_EPOCH_UNIX_OFFSET: u64 = 946_684_800;

/// Wall clock abstraction for the logging loop.
///
/// - epoch_seconds(): whole seconds since the device epoch (2000-01-01)
/// - sleep(): sleeps for the provided duration (implementations may simulate)
pub trait Clock {
    fn epoch_seconds(&self) -> i64;
    fn sleep(&self, d: Duration);
}

/// Default clock backed by `std::time::SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn epoch_seconds(&self) -> i64 {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        unix.saturating_sub(DEVICE_EPOCH_UNIX_OFFSET) as i64
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

pub mod test_clock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Deterministic clock whose time only moves when advanced or slept on.
    ///
    /// epoch_seconds() = start + elapsed
    /// sleep(d) advances internal time by d without actually sleeping.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        start: i64,
        elapsed: Arc<Mutex<Duration>>,
    }

    impl TestClock {
        pub fn new(start: i64) -> Self {
            Self {
                start,
                elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            }
        }

        /// Advance the clock by the given duration.
        pub fn advance(&self, d: Duration) {
            if let Ok(mut e) = self.elapsed.lock() {
                *e = e.saturating_add(d);
            }
        }
    }

    impl Clock for TestClock {
        fn epoch_seconds(&self) -> i64 {
            let e = self.elapsed.lock().map(|g| *g).unwrap_or(Duration::ZERO);
            self.start + e.as_secs() as i64
        }

        fn sleep(&self, d: Duration) {
            self.advance(d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_clock::TestClock;
    use super::*;

    #[test]
    fn test_clock_advances_on_sleep() {
        let c = TestClock::new(100);
        assert_eq!(c.epoch_seconds(), 100);
        c.sleep(Duration::from_secs(10));
        assert_eq!(c.epoch_seconds(), 110);
    }

    #[test]
    fn system_clock_is_after_device_epoch() {
        assert!(SystemClock::new().epoch_seconds() > 0);
    }
}
