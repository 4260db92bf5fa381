// src/extract/mod.rs

//! Candidate extraction strategies.
//!
//! Turns one raw snapshot into an ordered sequence of candidate items.
//! The right heuristic for a given source is discovered empirically, so
//! extraction is a swappable strategy selected by configuration.

mod heading;
mod markup;
mod segments;

pub use heading::HeadingExtractor;
pub use markup::MarkupExtractor;
pub use segments::SegmentExtractor;

use crate::error::Result;
use crate::models::{ExtractConfig, Strategy};

/// A pluggable extraction heuristic.
///
/// Implementations must be deterministic: the same snapshot always yields
/// the same candidate sequence in the same order.
pub trait ExtractStrategy: Send + Sync {
    /// Extract ordered candidate items from one snapshot.
    fn extract(&self, snapshot: &str) -> Result<Vec<String>>;

    /// Short strategy name for logging.
    fn name(&self) -> &'static str;
}

/// Build the strategy selected by the configuration.
pub fn build_extractor(config: &ExtractConfig) -> Result<Box<dyn ExtractStrategy>> {
    Ok(match config.strategy {
        Strategy::Markup => Box::new(MarkupExtractor::new(&config.selector)?),
        Strategy::Segments => Box::new(SegmentExtractor::new(
            config.min_words,
            config.no_timestamp_fallback,
        )?),
        Strategy::Heading => Box::new(HeadingExtractor::new(
            config.min_words,
            config.uppercase_threshold,
            config.no_timestamp_fallback,
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractConfig;

    #[test]
    fn builds_configured_strategy() {
        let mut config = ExtractConfig::default();

        config.strategy = Strategy::Markup;
        assert_eq!(build_extractor(&config).unwrap().name(), "markup");

        config.strategy = Strategy::Segments;
        assert_eq!(build_extractor(&config).unwrap().name(), "segments");

        config.strategy = Strategy::Heading;
        assert_eq!(build_extractor(&config).unwrap().name(), "heading");
    }

    #[test]
    fn rejects_invalid_selector() {
        let mut config = ExtractConfig::default();
        config.strategy = Strategy::Markup;
        config.selector = "a[".to_string();
        assert!(build_extractor(&config).is_err());
    }
}
