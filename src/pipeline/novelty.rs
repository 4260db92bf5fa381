//! Novelty detection against the set of already-seen items.
//!
//! The seen-set is unbounded by design: an entry, once added, is never
//! evicted and its string is never emitted again for the lifetime of the
//! tracker.

use std::collections::HashSet;

/// Tracks which candidate strings have already been confirmed as emitted.
#[derive(Debug, Default)]
pub struct NoveltyTracker {
    seen: HashSet<String>,
}

impl NoveltyTracker {
    /// Create a tracker with an empty seen-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the seen-set with previously emitted strings, e.g. read back
    /// from the emission log after a restart. Returns how many entries
    /// were new to the set.
    pub fn prime<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.seen.len();
        for item in items {
            self.seen.insert(normalize(item.as_ref()));
        }
        self.seen.len() - before
    }

    /// Keep only candidates never seen before, in their incoming order,
    /// and mark them as seen. Repeats within one call are kept once.
    pub fn filter_new(&mut self, candidates: Vec<String>) -> Vec<String> {
        let mut fresh = Vec::new();
        for candidate in candidates {
            let normalized = normalize(&candidate);
            if self.seen.insert(normalized.clone()) {
                fresh.push(normalized);
            }
        }
        fresh
    }

    /// Number of distinct items confirmed so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Comparison form: whitespace-trimmed, case preserved.
fn normalize(s: &str) -> String {
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_appearance_is_emitted_once() {
        let mut tracker = NoveltyTracker::new();

        let first = tracker.filter_new(owned(&["AAA", "BBB"]));
        assert_eq!(first, owned(&["AAA", "BBB"]));

        let second = tracker.filter_new(owned(&["AAA", "BBB", "CCC"]));
        assert_eq!(second, owned(&["CCC"]));
    }

    #[test]
    fn identical_snapshot_emits_nothing_on_repoll() {
        let mut tracker = NoveltyTracker::new();
        let candidates = owned(&["ONE HEADLINE", "TWO HEADLINE"]);

        assert_eq!(tracker.filter_new(candidates.clone()).len(), 2);
        assert!(tracker.filter_new(candidates).is_empty());
    }

    #[test]
    fn preserves_within_snapshot_order() {
        let mut tracker = NoveltyTracker::new();
        let fresh = tracker.filter_new(owned(&["Z LAST", "A FIRST", "M MIDDLE"]));
        assert_eq!(fresh, owned(&["Z LAST", "A FIRST", "M MIDDLE"]));
    }

    #[test]
    fn duplicate_within_one_snapshot_is_kept_once() {
        let mut tracker = NoveltyTracker::new();
        let fresh = tracker.filter_new(owned(&["SAME", "SAME", "OTHER"]));
        assert_eq!(fresh, owned(&["SAME", "OTHER"]));
    }

    #[test]
    fn normalization_trims_whitespace_only() {
        let mut tracker = NoveltyTracker::new();

        assert_eq!(tracker.filter_new(owned(&["  PADDED  "])), owned(&["PADDED"]));
        assert!(tracker.filter_new(owned(&["PADDED"])).is_empty());

        // Case stays significant.
        assert_eq!(tracker.filter_new(owned(&["padded"])), owned(&["padded"]));
    }

    #[test]
    fn priming_suppresses_historical_items() {
        let mut tracker = NoveltyTracker::new();
        let primed = tracker.prime(vec!["HELLO WORLD HEADLINE"]);
        assert_eq!(primed, 1);

        let fresh = tracker.filter_new(owned(&["HELLO WORLD HEADLINE", "NEW ITEM"]));
        assert_eq!(fresh, owned(&["NEW ITEM"]));
    }

    #[test]
    fn seen_count_grows_monotonically() {
        let mut tracker = NoveltyTracker::new();
        assert_eq!(tracker.seen_count(), 0);

        tracker.filter_new(owned(&["A", "B"]));
        assert_eq!(tracker.seen_count(), 2);

        tracker.filter_new(owned(&["A", "C"]));
        assert_eq!(tracker.seen_count(), 3);
    }
}
