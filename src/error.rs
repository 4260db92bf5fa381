// src/error.rs

//! Unified error handling for the watcher application.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Snapshot source not found or disappeared
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Snapshot content could not be turned into candidates
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Downstream sink rejected the payload or timed out
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    /// Ledger or log file could not be read or written
    #[error("Persistence failed for {path}: {message}")]
    Persistence { path: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding/decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration or data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a source-unavailable error.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable(message.into())
    }

    /// Create an extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::ExtractionFailed(message.into())
    }

    /// Create a publish error.
    pub fn publish(message: impl Into<String>) -> Self {
        Self::PublishFailed(message.into())
    }

    /// Create a persistence error for a file path.
    pub fn persistence(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the watch loop should drop its source handle and re-attach.
    pub fn needs_reattach(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_) | Self::Http(_))
    }
}
