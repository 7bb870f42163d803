//! Elapsed-time accumulation for the tick source.
//!
//! The daemon polls faster than once per second. `ElapsedClock` turns those
//! polls into whole elapsed seconds and keeps the sub-second remainder for the
//! next poll, so the engine only ever sees integer seconds.

use std::time::{Duration, Instant};

/// Monotonic accumulator of whole elapsed seconds.
#[derive(Debug, Clone, Default)]
pub struct ElapsedClock {
    /// Instant of the previous measurement, `None` while halted
    last: Option<Instant>,
    /// Sub-second remainder carried to the next measurement
    carry: Duration,
}

impl ElapsedClock {
    /// Creates a halted clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while measuring.
    pub fn is_measuring(&self) -> bool {
        self.last.is_some()
    }

    /// Starts measuring from `now`. Does nothing if already measuring.
    pub fn resume(&mut self, now: Instant) {
        if self.last.is_none() {
            self.last = Some(now);
        }
    }

    /// Stops measuring and drops any carried remainder.
    pub fn halt(&mut self) {
        self.last = None;
        self.carry = Duration::ZERO;
    }

    /// Restarts measuring from `now` with no carry.
    pub fn restart(&mut self, now: Instant) {
        self.last = Some(now);
        self.carry = Duration::ZERO;
    }

    /// Returns the whole seconds elapsed since the previous call.
    ///
    /// Returns 0 while halted.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last else {
            return 0;
        };

        let total = self.carry + now.saturating_duration_since(last);
        let whole = total.as_secs();
        self.carry = total - Duration::from_secs(whole);
        self.last = Some(now);

        u32::try_from(whole).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halted_clock_reports_nothing() {
        let mut clock = ElapsedClock::new();
        let now = Instant::now();

        assert!(!clock.is_measuring());
        assert_eq!(clock.advance(now + Duration::from_secs(30)), 0);
    }

    #[test]
    fn test_whole_seconds() {
        let mut clock = ElapsedClock::new();
        let start = Instant::now();
        clock.resume(start);

        assert_eq!(clock.advance(start + Duration::from_secs(3)), 3);
        assert_eq!(clock.advance(start + Duration::from_secs(4)), 1);
    }

    #[test]
    fn test_sub_second_carry() {
        let mut clock = ElapsedClock::new();
        let start = Instant::now();
        clock.resume(start);

        let mut total = 0;
        for step in 1..=10 {
            total += clock.advance(start + Duration::from_millis(200 * step));
        }
        assert_eq!(total, 2);
    }

    #[test]
    fn test_carry_across_polls() {
        let mut clock = ElapsedClock::new();
        let start = Instant::now();
        clock.resume(start);

        assert_eq!(clock.advance(start + Duration::from_millis(700)), 0);
        assert_eq!(clock.advance(start + Duration::from_millis(1400)), 1);
        assert_eq!(clock.advance(start + Duration::from_millis(2000)), 1);
    }

    #[test]
    fn test_large_gap() {
        let mut clock = ElapsedClock::new();
        let start = Instant::now();
        clock.resume(start);

        assert_eq!(clock.advance(start + Duration::from_secs(3600)), 3600);
    }

    #[test]
    fn test_halt_drops_carry() {
        let mut clock = ElapsedClock::new();
        let start = Instant::now();
        clock.resume(start);
        clock.advance(start + Duration::from_millis(900));

        clock.halt();
        assert!(!clock.is_measuring());

        let later = start + Duration::from_secs(10);
        clock.resume(later);
        assert_eq!(clock.advance(later + Duration::from_millis(500)), 0);
    }

    #[test]
    fn test_resume_twice_keeps_origin() {
        let mut clock = ElapsedClock::new();
        let start = Instant::now();
        clock.resume(start);
        clock.resume(start + Duration::from_secs(5));

        assert_eq!(clock.advance(start + Duration::from_secs(6)), 6);
    }

    #[test]
    fn test_restart_drops_carry() {
        let mut clock = ElapsedClock::new();
        let start = Instant::now();
        clock.resume(start);
        clock.advance(start + Duration::from_millis(900));

        let boundary = start + Duration::from_secs(1);
        clock.restart(boundary);
        assert_eq!(clock.advance(boundary + Duration::from_millis(500)), 0);
        assert!(clock.is_measuring());
    }
}
