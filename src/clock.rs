use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::MonitorError;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A wall-clock instant as whole seconds plus a sub-second nanosecond
/// component, `nanos` always below one second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub secs: u64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn new(secs: u64, nanos: u32) -> Self {
        debug_assert!(nanos < NANOS_PER_SEC);
        Self { secs, nanos }
    }

    /// The absolute instant one `period` after `self`, carrying the
    /// nanosecond component across the second boundary.
    pub fn plus(&self, period: Duration) -> Timestamp {
        let mut secs = self.secs + period.as_secs();
        let mut nanos = self.nanos + period.subsec_nanos();
        if nanos >= NANOS_PER_SEC {
            secs += 1;
            nanos -= NANOS_PER_SEC;
        }
        Timestamp { secs, nanos }
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is later.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        Duration::new(self.secs, self.nanos).saturating_sub(Duration::new(earlier.secs, earlier.nanos))
    }
}

pub trait Clock {
    /// Current wall-clock time. A monitor that cannot read the clock cannot
    /// hold its cadence, so callers treat failure as fatal.
    fn now(&self) -> Result<Timestamp, MonitorError>;

    /// Block until `deadline`; return immediately if it already passed.
    fn sleep_until(&self, deadline: Timestamp);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp, MonitorError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| MonitorError::Clock(e.to_string()))?;
        Ok(Timestamp::new(since_epoch.as_secs(), since_epoch.subsec_nanos()))
    }

    fn sleep_until(&self, deadline: Timestamp) {
        // Re-reading the clock keeps the deadline absolute: work done earlier
        // in the tick shortens the sleep instead of shifting the cadence.
        if let Ok(now) = self.now() {
            let remaining = deadline.saturating_since(now);
            if !remaining.is_zero() {
                thread::sleep(remaining);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_without_carry() {
        let t = Timestamp::new(10, 100_000_000);
        assert_eq!(t.plus(Duration::from_millis(200)), Timestamp::new(10, 300_000_000));
    }

    #[test]
    fn test_plus_carries_across_second_boundary() {
        let t = Timestamp::new(10, 900_000_000);
        assert_eq!(t.plus(Duration::from_millis(200)), Timestamp::new(11, 100_000_000));
    }

    #[test]
    fn test_plus_exact_rollover() {
        let t = Timestamp::new(10, 800_000_000);
        assert_eq!(t.plus(Duration::from_millis(200)), Timestamp::new(11, 0));
    }

    #[test]
    fn test_plus_whole_seconds() {
        let t = Timestamp::new(10, 250_000_000);
        assert_eq!(t.plus(Duration::from_secs(3)), Timestamp::new(13, 250_000_000));
    }

    #[test]
    fn test_ordering_is_seconds_then_nanos() {
        assert!(Timestamp::new(10, 999_999_999) < Timestamp::new(11, 0));
        assert!(Timestamp::new(11, 1) > Timestamp::new(11, 0));
    }

    #[test]
    fn test_saturating_since() {
        let earlier = Timestamp::new(10, 900_000_000);
        let later = Timestamp::new(11, 100_000_000);
        assert_eq!(later.saturating_since(earlier), Duration::from_millis(200));
        assert_eq!(earlier.saturating_since(later), Duration::ZERO);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now().unwrap();
        let b = clock.now().unwrap();
        assert!(b >= a);
    }

    #[test]
    fn test_sleep_until_past_deadline_returns() {
        let clock = SystemClock;
        let now = clock.now().unwrap();
        // Already-elapsed deadline must not block.
        clock.sleep_until(Timestamp::new(now.secs.saturating_sub(1), now.nanos));
    }
}
