// src/extract/segments.rs

//! Timestamp-delimited extraction strategy.
//!
//! Splits a snapshot into segments delimited by `HH:MM:SS` timestamps.
//! A segment spans from the start of one timestamp to the start of the
//! next; the final segment runs to the end of the input. Text before the
//! first timestamp is never a candidate.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};
use crate::models::FallbackPolicy;

use super::ExtractStrategy;

/// Pattern marking the start of one feed line, e.g. `09:15:00`.
const TIMESTAMP_PATTERN: &str = r"\d{2}:\d{2}:\d{2}";

/// Extracts timestamp-delimited segments from plain text.
#[derive(Debug)]
pub struct SegmentExtractor {
    pattern: Regex,
    min_words: usize,
    fallback: FallbackPolicy,
}

impl SegmentExtractor {
    /// Create an extractor dropping candidates with fewer than `min_words`
    /// words, using `fallback` when the snapshot has no timestamps.
    pub fn new(min_words: usize, fallback: FallbackPolicy) -> Result<Self> {
        let pattern = Regex::new(TIMESTAMP_PATTERN)
            .map_err(|e| AppError::validation(format!("timestamp pattern: {e}")))?;
        Ok(Self {
            pattern,
            min_words,
            fallback,
        })
    }

    fn long_enough(&self, candidate: &str) -> bool {
        candidate.unicode_words().count() >= self.min_words
    }
}

impl ExtractStrategy for SegmentExtractor {
    fn extract(&self, snapshot: &str) -> Result<Vec<String>> {
        if snapshot.trim().is_empty() {
            return Err(AppError::extraction("empty snapshot"));
        }

        let starts: Vec<usize> = self
            .pattern
            .find_iter(snapshot)
            .map(|m| m.start())
            .collect();

        if starts.is_empty() {
            return Ok(match self.fallback {
                FallbackPolicy::Empty => Vec::new(),
                FallbackPolicy::WholeText => {
                    let whole = snapshot.trim();
                    if self.long_enough(whole) {
                        vec![whole.to_string()]
                    } else {
                        Vec::new()
                    }
                }
            });
        }

        let mut candidates = Vec::new();
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(snapshot.len());
            let segment = snapshot[start..end].trim();
            if self.long_enough(segment) {
                candidates.push(segment.to_string());
            }
        }

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "segments"
    }
}
