//! Lossy sampling gate for extraction passes.

use chrono::{DateTime, TimeDelta, Utc};

/// Admits at most one trigger per window.
///
/// Triggers inside the window are dropped, never queued. Later settling
/// events re-trigger once the window has passed, so the final form state is
/// still captured.
#[derive(Debug, Clone)]
pub struct Throttle {
    last_update: DateTime<Utc>,
    delay: TimeDelta,
}

impl Throttle {
    /// Creates a gate with the given window. The first trigger always passes.
    #[must_use]
    pub fn new(delay: TimeDelta) -> Self {
        Self {
            last_update: DateTime::<Utc>::UNIX_EPOCH,
            delay,
        }
    }

    /// Admits the trigger at `now` if a full window has elapsed since the
    /// last admitted one, recording `now` as the new reference point.
    pub fn try_acquire(&mut self, now: DateTime<Utc>) -> bool {
        if now - self.last_update >= self.delay {
            self.last_update = now;
            true
        } else {
            false
        }
    }

    /// Time of the last admitted trigger.
    #[must_use]
    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }
}
