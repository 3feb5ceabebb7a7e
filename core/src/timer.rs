use std::time::Duration;

/// Rate at which the delay and sound timers count down.
pub const TIMER_FREQUENCY_HZ: u32 = 60;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Frequency divider turning arbitrary elapsed host time into 60 Hz timer ticks.
///
/// Elapsed time is accumulated as nanoseconds scaled by the timer frequency, so a
/// tick is due every time the accumulator reaches one second. Integer arithmetic
/// keeps long runs free of drift: 1000 ms always yields exactly 60 ticks.
#[derive(Clone, Debug, Default)]
pub struct TimerClock {
    accumulator: u128,
}

impl TimerClock {
    pub fn new() -> TimerClock {
        TimerClock::default()
    }

    /// Adds `elapsed` to the accumulator and returns the number of ticks now due.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        self.accumulator += elapsed.as_nanos() * TIMER_FREQUENCY_HZ as u128;

        let ticks = self.accumulator / NANOS_PER_SEC;
        self.accumulator %= NANOS_PER_SEC;
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    pub fn advance_ms(&mut self, elapsed_ms: u64) -> u64 {
        self.advance(Duration::from_millis(elapsed_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_second() {
        let mut clock = TimerClock::new();
        assert_eq!(clock.advance_ms(1000), 60);
    }

    #[test]
    fn test_accumulates_small_steps() {
        let mut clock = TimerClock::new();

        // 16ms is just short of one period
        assert_eq!(clock.advance_ms(16), 0);
        assert_eq!(clock.advance_ms(1), 1);

        // Remainder carries over: 17ms + 16ms = 33ms < 2 periods
        assert_eq!(clock.advance_ms(16), 0);
        assert_eq!(clock.advance_ms(1), 1);
    }

    #[test]
    fn test_many_short_frames() {
        let mut clock = TimerClock::new();
        let ticks: u64 = (0..1000).map(|_| clock.advance_ms(1)).sum();
        assert_eq!(ticks, 60);
    }

    #[test]
    fn test_huge_elapsed_saturates() {
        let mut clock = TimerClock::new();
        assert_eq!(clock.advance(Duration::from_secs(u64::MAX / 2)), u64::MAX);
    }
}
