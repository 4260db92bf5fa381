//! Debounce buffer that batches fresh items into one publishable payload.
//!
//! Items accumulate until no new item has arrived for a full quiet period;
//! only then does the buffer flush. A burst arriving across several polls
//! therefore goes out as a single aggregate instead of one post per item.

use std::time::{Duration, Instant};

pub struct AggregationBuffer {
    quiet_period: Duration,
    items: Vec<String>,
    last_add: Option<Instant>,
}

impl AggregationBuffer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            items: Vec::new(),
            last_add: None,
        }
    }

    /// Add an item and restart the quiet-period clock.
    pub fn add(&mut self, item: String) {
        self.items.push(item);
        self.last_add = Some(Instant::now());
    }

    /// True once the buffer holds items and the most recent addition has
    /// aged past the quiet period.
    pub fn should_flush(&self) -> bool {
        match self.last_add {
            // Inclusive comparison: a zero quiet period flushes on the
            // same cycle the item arrived.
            Some(last) if !self.items.is_empty() => last.elapsed() >= self.quiet_period,
            _ => false,
        }
    }

    /// Drain the buffer into one newline-joined payload, oldest first.
    pub fn flush(&mut self) -> String {
        let payload = self.items.join("\n");
        self.items.clear();
        self.last_add = None;
        payload
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
