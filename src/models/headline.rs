// src/models/headline.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate confirmed as new, tagged with its emission timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedHeadline {
    /// When the watcher confirmed the item
    pub emitted_at: DateTime<Utc>,

    /// The normalized item text
    pub text: String,
}

impl EmittedHeadline {
    /// Tag a candidate with the current time.
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            emitted_at: Utc::now(),
            text: text.into(),
        }
    }
}
