use std::sync::Mutex;

use agora_core::Timestamp;
use agora_ports::Clock;
use chrono::{Duration, TimeZone, Utc};

/// Frozen clock advanced by hand
///
/// Time does not move on its own; tests call [`advance`](Self::advance)
/// or [`set`](Self::set) to control exactly how much wall-clock time a
/// decay tick sees.
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Create a clock frozen at an arbitrary fixed epoch
    pub fn fixed() -> Self {
        // Deterministic and far from any timestamp arithmetic edge
        let start = Utc.with_ymd_and_hms(2022, 8, 1, 9, 0, 0).unwrap();
        Self::new(start)
    }

    /// Move the clock forward
    pub fn advance(&self, duration: Duration) {
        let mut now = self.lock();
        *now += duration;
    }

    /// Jump to an absolute time
    pub fn set(&self, timestamp: Timestamp) {
        *self.lock() = timestamp;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timestamp> {
        match self.now.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.lock()
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::fixed();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_advance_moves_time_forward() {
        let clock = ManualClock::fixed();
        let before = clock.now();
        clock.advance(Duration::seconds(45));
        assert_eq!(clock.now() - before, Duration::seconds(45));
    }

    #[test]
    fn test_set_jumps_to_absolute_time() {
        let clock = ManualClock::fixed();
        let target = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        clock.set(target);
        assert_eq!(clock.now(), target);
    }
}
