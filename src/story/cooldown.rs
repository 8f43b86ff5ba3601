//! Countdown after a rate-limit rejection
//!
//! The countdown is advanced by the frame loop rather than a timer thread.
//! Each call to [`Cooldown::tick`] consumes every whole second that has
//! elapsed since the last decrement, so a slow frame never skips a value and
//! never decrements twice for the same second.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Result of advancing the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownTick {
    /// No countdown is running
    Inactive,
    /// Still counting; holds the seconds left
    Counting(u32),
    /// The countdown reached zero during this tick
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct Cooldown {
    remaining: u32,
    next_tick: Option<Instant>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown at `seconds`
    pub fn start(&mut self, seconds: u32, now: Instant) {
        self.remaining = seconds;
        self.next_tick = (seconds > 0).then(|| now + TICK);
    }

    /// Seconds left before requests are allowed again
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Time until the next decrement, for scheduling a repaint
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Advance the countdown to `now`
    pub fn tick(&mut self, now: Instant) -> CooldownTick {
        let Some(mut deadline) = self.next_tick else {
            return CooldownTick::Inactive;
        };

        while now >= deadline && self.remaining > 0 {
            self.remaining -= 1;
            deadline += TICK;
        }

        if self.remaining == 0 {
            self.next_tick = None;
            CooldownTick::Expired
        } else {
            self.next_tick = Some(deadline);
            CooldownTick::Counting(self.remaining)
        }
    }

    /// Stop the countdown without waiting for it to expire
    pub fn cancel(&mut self) {
        self.remaining = 0;
        self.next_tick = None;
    }
}
