use serde::{Deserialize, Serialize};

use crate::time::Millis;

/// An effect that is active for a fixed window of wall-clock time after it
/// was applied. Expiry is re-evaluated on every query; nothing is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub applied_at: Millis,
    pub duration: Millis,
}

impl TimedEffect {
    pub fn new(applied_at: Millis, duration: Millis) -> Self {
        Self {
            applied_at,
            duration,
        }
    }

    pub fn is_active(&self, now: Millis) -> bool {
        now.saturating_sub(self.applied_at) < self.duration
    }
}
