//! Deferred card reveals.
//!
//! After an advance the session already points at the next card, but the
//! screen keeps showing the old one (front side) until the flip-back
//! animation would have finished. Each category has at most one pending
//! reveal; scheduling again replaces it, so a late reveal can never repaint a
//! card the user has already moved past.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct RevealScheduler {
    delay: Duration,
    pending: HashMap<String, Instant>,
}

impl RevealScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Returns true when an earlier reveal for `category` was superseded.
    pub fn schedule(&mut self, category: &str, now: Instant) -> bool {
        let superseded = self
            .pending
            .insert(category.to_string(), now + self.delay)
            .is_some();
        if superseded {
            log::trace!("{category}: pending reveal superseded");
        }
        superseded
    }

    /// Returns true when a pending reveal was dropped.
    pub fn cancel(&mut self, category: &str) -> bool {
        self.pending.remove(category).is_some()
    }

    pub fn is_pending(&self, category: &str) -> bool {
        self.pending.contains_key(category)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Removes and returns every category whose reveal is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<String> {
        let mut due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(category, _)| category.clone())
            .collect();
        due.sort();

        for category in &due {
            self.pending.remove(category);
        }
        due
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}
