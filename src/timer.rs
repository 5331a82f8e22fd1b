use std::time::{Duration, Instant};

pub const TIMER_DEC_PER_SECOND: u64 = 60;

/// 8 bit countdown register, stops at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    pub fn decrement(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

/// Wall clock pacing for hosts that tick timers at a fixed rate.
#[derive(Debug)]
pub struct TickClock {
    period: Duration,
    last_updated: Instant,
}

impl TickClock {
    pub fn new(per_second: u64) -> Self {
        Self {
            // never shorter than 1ns, whatever the rate
            period: Duration::from_nanos((1_000_000_000 / per_second.max(1)).max(1)),
            last_updated: Instant::now(),
        }
    }

    pub fn sixty_hz() -> Self {
        Self::new(TIMER_DEC_PER_SECOND)
    }

    /// Number of whole periods elapsed since the previous call.
    pub fn due(&mut self) -> u32 {
        self.due_at(Instant::now())
    }

    pub fn due_at(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last_updated);
        let ticks = u32::try_from(elapsed.as_nanos() / self.period.as_nanos()).unwrap_or(u32::MAX);
        self.last_updated += self.period * ticks;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturates_at_zero() {
        let mut timer = Timer::default();
        timer.set(2);
        timer.decrement();
        timer.decrement();
        timer.decrement();
        assert_eq!(timer.get(), 0);
    }

    #[test]
    fn test_clock_counts_whole_periods() {
        let mut clock = TickClock::new(100);
        let start = clock.last_updated;
        assert_eq!(clock.due_at(start + Duration::from_millis(5)), 0);
        assert_eq!(clock.due_at(start + Duration::from_millis(25)), 2);
        // the leftover 5ms carries over
        assert_eq!(clock.due_at(start + Duration::from_millis(30)), 1);
    }

    #[test]
    fn test_clock_survives_extreme_rates() {
        let mut clock = TickClock::new(2_000_000_000);
        let start = clock.last_updated;
        assert_eq!(clock.period, Duration::from_nanos(1));
        assert_eq!(clock.due_at(start + Duration::from_millis(1)), 1_000_000);

        let mut clock = TickClock::new(0);
        let start = clock.last_updated;
        assert_eq!(clock.due_at(start + Duration::from_millis(1500)), 1);
    }

    #[test]
    fn test_clock_saturates_after_long_stall() {
        let mut clock = TickClock::new(1_000_000_000);
        let start = clock.last_updated;
        assert_eq!(clock.due_at(start + Duration::from_secs(10)), u32::MAX);
    }
}
