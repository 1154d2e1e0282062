use std::time::Duration;

use crate::config::SchedulerConfig;

/// Turns variable wall-clock frames into a whole number of fixed ticks.
///
/// Elapsed time times the speed multiplier is banked into a budget and spent
/// one `tick_rate` at a time, at most `max_ticks_per_frame` per frame. If a
/// capped frame still leaves more than `discard_multiple` ticks banked, the
/// remainder is thrown away instead of queued. Paused frames neither tick nor
/// bank time.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    tick_rate: f64,
    max_ticks_per_frame: u32,
    discard_multiple: f64,
    budget: f64,
    dropped: f64,
}

impl TickScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            tick_rate: config.tick_rate,
            max_ticks_per_frame: config.max_ticks_per_frame,
            discard_multiple: config.discard_multiple,
            budget: 0.0,
            dropped: 0.0,
        }
    }

    /// Account for one frame and return how many ticks to run now.
    pub fn advance(&mut self, elapsed: Duration, speed: f64, playing: bool) -> u32 {
        if !playing {
            return 0;
        }
        self.budget += elapsed.as_secs_f64() * speed;

        let mut ticks = 0;
        while self.budget >= self.tick_rate && ticks < self.max_ticks_per_frame {
            self.budget -= self.tick_rate;
            ticks += 1;
        }

        if self.budget > self.tick_rate * self.discard_multiple {
            tracing::debug!(
                discarded = self.budget,
                ticks,
                "frame over budget, dropping banked time"
            );
            self.dropped += self.budget;
            self.budget = 0.0;
        }
        ticks
    }

    /// Logical seconds banked but not yet spent.
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Total logical seconds thrown away by overload protection.
    pub fn dropped(&self) -> f64 {
        self.dropped
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> TickScheduler {
        TickScheduler::new(&SchedulerConfig::default())
    }

    #[test]
    fn long_frame_is_capped_and_remainder_dropped() {
        let mut s = scheduler();
        assert_eq!(s.advance(Duration::from_secs(3), 1.0, true), 10);
        assert!(s.budget().abs() < f64::EPSILON);
        assert!((s.dropped() - 2.0).abs() < 1e-6);

        // The dropped time does not come back on the next frame.
        assert_eq!(s.advance(Duration::ZERO, 1.0, true), 0);
    }

    #[test]
    fn short_frames_accumulate() {
        let mut s = scheduler();
        assert_eq!(s.advance(Duration::from_millis(50), 1.0, true), 0);
        assert_eq!(s.advance(Duration::from_millis(60), 1.0, true), 1);
        assert!((s.budget() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn speed_scales_ticks_per_frame() {
        let mut s = scheduler();
        assert_eq!(s.advance(Duration::from_millis(100), 5.0, true), 5);
        assert!(s.budget() < s.tick_rate());
    }

    #[test]
    fn paused_frames_do_not_bank_time() {
        let mut s = scheduler();
        assert_eq!(s.advance(Duration::from_secs(10), 1.0, false), 0);
        assert!(s.budget().abs() < f64::EPSILON);
        assert_eq!(s.advance(Duration::from_millis(100), 1.0, true), 1);
    }

    #[test]
    fn small_leftover_is_kept_after_cap() {
        let mut s = scheduler();
        // 1.15 logical seconds: 10 ticks, 0.15 left, under the 0.2 threshold.
        assert_eq!(s.advance(Duration::from_millis(1150), 1.0, true), 10);
        assert!((s.budget() - 0.15).abs() < 1e-6);
        assert_eq!(s.advance(Duration::ZERO, 1.0, true), 1);
    }
}
