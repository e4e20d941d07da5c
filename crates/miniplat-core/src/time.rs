use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Wall-clock timestamp in milliseconds.
pub type Millis = u64;

/// Source of wall-clock time for the simulation.
///
/// Every timer in the game (damage cooldown, attack duration, shooter
/// cooldown, invincibility expiry) is a lazy comparison against `now_ms`.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

/// Monotonic clock measuring milliseconds since it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Minimum interval gating a repeatable effect.
///
/// `None` means the effect has never fired, so the first trigger always
/// passes regardless of the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    pub interval: Millis,
    pub last: Option<Millis>,
}

impl Cooldown {
    pub fn new(interval: Millis) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// A cooldown that counts as having just fired at `now`.
    pub fn started_at(interval: Millis, now: Millis) -> Self {
        Self {
            interval,
            last: Some(now),
        }
    }

    pub fn is_ready(&self, now: Millis) -> bool {
        match self.last {
            Some(last) => now.saturating_sub(last) >= self.interval,
            None => true,
        }
    }

    /// Fire the effect if the interval has elapsed. Returns whether it fired.
    pub fn try_trigger(&mut self, now: Millis) -> bool {
        if self.is_ready(now) {
            self.last = Some(now);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
