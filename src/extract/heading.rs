// src/extract/heading.rs

//! Heading-heuristic extraction strategy.
//!
//! Runs the timestamp-delimited strategy, then keeps only segments that
//! look like headings: the fraction of purely alphabetic words written
//! fully upper-case meets the configured threshold, or every alphabetic
//! character in the segment is upper-case.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::models::FallbackPolicy;

use super::{ExtractStrategy, SegmentExtractor};

/// Filters timestamp-delimited segments down to heading-like ones.
#[derive(Debug)]
pub struct HeadingExtractor {
    segments: SegmentExtractor,
    uppercase_threshold: f64,
}

impl HeadingExtractor {
    /// Create an extractor accepting segments whose upper-case word ratio
    /// meets or exceeds `uppercase_threshold`.
    pub fn new(
        min_words: usize,
        uppercase_threshold: f64,
        fallback: FallbackPolicy,
    ) -> Result<Self> {
        Ok(Self {
            segments: SegmentExtractor::new(min_words, fallback)?,
            uppercase_threshold,
        })
    }

    fn looks_like_heading(&self, text: &str) -> bool {
        if !text.chars().any(char::is_alphabetic) {
            return false;
        }

        let alphabetic_words: Vec<&str> = text
            .unicode_words()
            .filter(|word| word.chars().all(char::is_alphabetic))
            .collect();

        if !alphabetic_words.is_empty() {
            let upper = alphabetic_words
                .iter()
                .filter(|word| word.chars().all(char::is_uppercase))
                .count();

            if upper as f64 / alphabetic_words.len() as f64 >= self.uppercase_threshold {
                return true;
            }
        }

        text.chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
    }
}

impl ExtractStrategy for HeadingExtractor {
    fn extract(&self, snapshot: &str) -> Result<Vec<String>> {
        let candidates = self.segments.extract(snapshot)?;
        Ok(candidates
            .into_iter()
            .filter(|candidate| self.looks_like_heading(candidate))
            .collect())
    }

    fn name(&self) -> &'static str {
        "heading"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(min_words: usize, threshold: f64) -> HeadingExtractor {
        HeadingExtractor::new(min_words, threshold, FallbackPolicy::Empty).unwrap()
    }

    #[test]
    fn keeps_shouted_headline_and_drops_chatter() {
        let text = "09:15:00 BREAKING MARKET ALERT HERE\n09:15:05 normal lowercase chatter";
        let candidates = extractor(5, 0.75).extract(text).unwrap();
        assert_eq!(candidates, vec!["09:15:00 BREAKING MARKET ALERT HERE"]);
    }

    #[test]
    fn threshold_is_inclusive() {
        // Three of four alphabetic words upper-case: exactly 0.75.
        let text = "09:00:00 ALPHA BETA GAMMA delta";
        let candidates = extractor(1, 0.75).extract(text).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn below_threshold_is_dropped() {
        // Two of four alphabetic words upper-case: 0.5.
        let text = "09:00:00 ALPHA beta GAMMA delta";
        let candidates = extractor(1, 0.75).extract(text).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn all_caps_segment_passes_without_alphabetic_words() {
        // Ticker-style tokens mix letters and digits, so no word is purely
        // alphabetic, but every alphabetic character is upper-case.
        let text = "14:05:00 AAPL5 TSLA9 XQ2";
        let candidates = extractor(1, 0.75).extract(text).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn digits_only_segment_is_not_a_heading() {
        let text = "14:05:00 123 456 789";
        let candidates = extractor(1, 0.75).extract(text).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn min_words_applies_before_the_heading_filter() {
        let text = "09:15:00 SHORT\n09:15:05 LONG ENOUGH UPPER HEADLINE";
        let candidates = extractor(5, 0.75).extract(text).unwrap();
        assert_eq!(candidates, vec!["09:15:05 LONG ENOUGH UPPER HEADLINE"]);
    }

    #[test]
    fn whole_text_fallback_feeds_the_heading_filter() {
        let upper = HeadingExtractor::new(2, 0.75, FallbackPolicy::WholeText).unwrap();
        assert_eq!(
            upper.extract("STANDALONE ALERT TEXT").unwrap(),
            vec!["STANDALONE ALERT TEXT"]
        );
        assert!(upper.extract("standalone quiet text").unwrap().is_empty());
    }
}
