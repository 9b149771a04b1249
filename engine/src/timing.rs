//! Frame Pacing
//!
//! Fixed-rate tick scheduling for the game loop. The event loop sleeps until
//! [`FramePacer::deadline`], then runs one update and one render.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FramePacer {
    period: Duration,
    next: Instant,
}

impl FramePacer {
    /// Pacer for `hz` ticks per second, first tick due immediately.
    pub fn new(hz: u32) -> Self {
        Self::starting_at(hz, Instant::now())
    }

    pub fn starting_at(hz: u32, now: Instant) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / hz.max(1) as f64),
            next: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    pub fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Schedule the next tick one period after the current deadline.
    ///
    /// When the loop has fallen more than a period behind, missed ticks are
    /// skipped rather than replayed back to back.
    pub fn advance(&mut self, now: Instant) {
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_hz_period() {
        let pacer = FramePacer::new(60);
        assert_eq!(pacer.period().as_micros(), 16_666);
    }

    #[test]
    fn test_due_after_deadline() {
        let start = Instant::now();
        let mut pacer = FramePacer::starting_at(60, start);
        assert!(pacer.due(start));

        pacer.advance(start);
        assert!(!pacer.due(start));
        assert!(pacer.due(start + pacer.period()));
    }

    #[test]
    fn test_advance_skips_missed_ticks() {
        let start = Instant::now();
        let mut pacer = FramePacer::starting_at(60, start);
        let late = start + Duration::from_secs(1);
        pacer.advance(late);
        assert_eq!(pacer.deadline(), late + pacer.period());
    }
}
