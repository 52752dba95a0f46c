use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Cycles through shuffled "recent purchase" messages.
///
/// The order is shuffled once; after the last message the cycle starts over in the same
/// order.
#[derive(Debug)]
pub struct NotificationTicker {
    messages: Vec<String>,
    index: usize,
    visible: Option<usize>,
    rng: StdRng,
}

impl NotificationTicker {
    /// Returns `None` when there are no messages to show.
    pub fn new(messages: Vec<String>, seed: Option<u64>) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut messages = messages;
        messages.shuffle(&mut rng);

        Some(Self {
            messages,
            index: 0,
            visible: None,
            rng,
        })
    }

    /// Shows the next message and returns it.
    pub fn show_next(&mut self) -> &str {
        let shown = self.index;
        self.index = (self.index + 1) % self.messages.len();
        self.visible = Some(shown);
        &self.messages[shown]
    }

    pub fn hide(&mut self) {
        self.visible = None;
    }

    pub fn visible(&self) -> Option<&str> {
        self.visible.map(|index| self.messages[index].as_str())
    }

    /// Random delay in `[min, max]`, millisecond resolution.
    pub fn next_delay(&mut self, min: Duration, max: Duration) -> Duration {
        let min_ms = min.as_millis() as u64;
        let max_ms = (max.as_millis() as u64).max(min_ms);
        Duration::from_millis(self.rng.gen_range(min_ms..=max_ms))
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
