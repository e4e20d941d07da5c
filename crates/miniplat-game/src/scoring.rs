use serde::{Deserialize, Serialize};

/// Run score. Only ever grows; reset by starting a new session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Add `points`, saturating at `u32::MAX`.
    pub fn add(&mut self, points: u32) {
        self.0 = self.0.saturating_add(points);
    }
}

/// Whole seconds elapsed between `start` and `now`, for the HUD.
pub fn elapsed_secs(start_ms: u64, now_ms: u64) -> u64 {
    now_ms.saturating_sub(start_ms) / 1000
}
