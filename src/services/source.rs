// src/services/source.rs

//! Snapshot sources.
//!
//! A source is attached once to verify it is the intended feed, then
//! polled repeatedly for whole-content snapshots.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::utils::http;

/// A monitored feed that can be attached to and snapshotted.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Verify the source exists and is the intended one.
    async fn attach(&mut self) -> Result<()>;

    /// Fetch the current full content of the source.
    async fn snapshot(&mut self) -> Result<String>;

    /// Identity for log lines.
    fn describe(&self) -> String;
}

/// HTTP page source.
pub struct PageSource {
    client: Client,
    url: Url,
    title_contains: Option<String>,
}

impl PageSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = http::create_client(&config.user_agent, config.timeout())?;
        Ok(Self {
            client,
            url: Url::parse(&config.url)?,
            title_contains: config.title_contains.clone(),
        })
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AppError::source_unavailable(format!("{}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::source_unavailable(format!(
                "{} answered {}",
                self.url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::source_unavailable(format!("{}: {}", self.url, e)))
    }
}

#[async_trait]
impl SnapshotSource for PageSource {
    async fn attach(&mut self) -> Result<()> {
        let body = self.fetch().await?;
        if let Some(fragment) = &self.title_contains {
            let title = page_title(&body).unwrap_or_default();
            if !title.contains(fragment.as_str()) {
                return Err(AppError::source_unavailable(format!(
                    "page title {:?} does not contain {:?}",
                    title, fragment
                )));
            }
        }
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<String> {
        self.fetch().await
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Text of the document's `<title>`, if present.
fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;
    Some(element.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_title_reads_the_title_element() {
        let html = "<html><head><title> Live Feed </title></head><body></body></html>";
        assert_eq!(page_title(html).as_deref(), Some("Live Feed"));
    }

    #[test]
    fn page_title_is_none_without_a_title() {
        assert_eq!(page_title("<html><body><p>no head</p></body></html>"), None);
    }

    #[test]
    fn describe_names_the_url() {
        let config = SourceConfig {
            url: "https://news.example.com/live".to_string(),
            ..SourceConfig::default()
        };
        let source = PageSource::new(&config).unwrap();
        assert_eq!(source.describe(), "https://news.example.com/live");
    }

    #[test]
    fn rejects_a_malformed_url() {
        let config = SourceConfig {
            url: "not a url".to_string(),
            ..SourceConfig::default()
        };
        assert!(PageSource::new(&config).is_err());
    }
}
