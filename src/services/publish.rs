// src/services/publish.rs

//! Publish sinks for aggregated payloads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::utils::http;

/// Downstream receiver of aggregated payloads.
#[async_trait]
pub trait PublishSink: Send + Sync {
    async fn publish(&self, text: &str) -> Result<()>;
}

/// POSTs each payload to a webhook as `{"content": text}`.
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http::create_client(user_agent, timeout)?,
            url: url.into(),
        })
    }

    fn payload(text: &str) -> serde_json::Value {
        json!({ "content": text })
    }
}

#[async_trait]
impl PublishSink for WebhookSink {
    async fn publish(&self, text: &str) -> Result<()> {
        let body = serde_json::to_string(&Self::payload(text))?;
        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::publish(format!("webhook unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::publish(format!(
                "webhook answered {}: {}",
                status, detail
            )));
        }
        Ok(())
    }
}

/// Prints payloads to stdout; the default sink when no webhook is configured.
pub struct StdoutSink;

#[async_trait]
impl PublishSink for StdoutSink {
    async fn publish(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_wraps_the_text_in_a_content_field() {
        let payload = WebhookSink::payload("LINE ONE\nLINE TWO");
        assert_eq!(payload, json!({ "content": "LINE ONE\nLINE TWO" }));
    }

    #[tokio::test]
    async fn stdout_sink_always_accepts() {
        assert!(StdoutSink.publish("ANY TEXT").await.is_ok());
    }
}
