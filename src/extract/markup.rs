// src/extract/markup.rs

//! Structured-markup extraction strategy.
//!
//! Parses the snapshot as HTML and returns the trimmed text of every
//! element matching a configured CSS selector, in document order.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};

use super::ExtractStrategy;

/// Extracts the text of elements matching a CSS selector.
#[derive(Debug)]
pub struct MarkupExtractor {
    selector: Selector,
}

impl MarkupExtractor {
    /// Create an extractor for the given CSS selector (e.g. `a.newsTitleLink`).
    pub fn new(selector: &str) -> Result<Self> {
        let parsed = Selector::parse(selector).map_err(|e| AppError::selector(selector, e))?;
        Ok(Self { selector: parsed })
    }
}

impl ExtractStrategy for MarkupExtractor {
    fn extract(&self, snapshot: &str) -> Result<Vec<String>> {
        if snapshot.trim().is_empty() {
            return Err(AppError::extraction("empty snapshot"));
        }

        let document = Html::parse_document(snapshot);

        let candidates = document
            .select(&self.selector)
            .map(|element| normalize_whitespace(&element.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .collect();

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "markup"
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>Live Feed</title></head><body>
          <div class="wrap">
            <a class="newsTitleLink" href="/1">FED HOLDS RATES STEADY</a>
            <a class="other" href="/x">sidebar link</a>
            <a class="newsTitleLink" href="/2">
                OIL   SPIKES
                ON SUPPLY NEWS
            </a>
            <a class="newsTitleLink" href="/3">   </a>
          </div>
        </body></html>
    "#;

    #[test]
    fn selects_matching_elements_in_document_order() {
        let extractor = MarkupExtractor::new("a.newsTitleLink").unwrap();
        let candidates = extractor.extract(PAGE).unwrap();
        assert_eq!(
            candidates,
            vec!["FED HOLDS RATES STEADY", "OIL SPIKES ON SUPPLY NEWS"]
        );
    }

    #[test]
    fn drops_empty_text_elements() {
        let extractor = MarkupExtractor::new("a.newsTitleLink").unwrap();
        let candidates = extractor.extract(PAGE).unwrap();
        assert!(candidates.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn no_matches_yields_empty_sequence() {
        let extractor = MarkupExtractor::new("span.missing").unwrap();
        assert!(extractor.extract(PAGE).unwrap().is_empty());
    }

    #[test]
    fn collects_nested_element_text() {
        let extractor = MarkupExtractor::new("a.headline").unwrap();
        let html = r#"<a class="headline"><b>BIG</b> <i>NEWS</i></a>"#;
        assert_eq!(extractor.extract(html).unwrap(), vec!["BIG NEWS"]);
    }

    #[test]
    fn empty_snapshot_is_an_extraction_error() {
        let extractor = MarkupExtractor::new("a").unwrap();
        let err = extractor.extract("  \n ").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[test]
    fn invalid_selector_fails_at_construction() {
        let err = MarkupExtractor::new("a[").unwrap_err();
        assert!(matches!(err, AppError::Selector { .. }));
    }

    #[test]
    fn deterministic_over_repeated_extractions() {
        let extractor = MarkupExtractor::new("a.newsTitleLink").unwrap();
        let first = extractor.extract(PAGE).unwrap();
        let second = extractor.extract(PAGE).unwrap();
        assert_eq!(first, second);
    }
}
