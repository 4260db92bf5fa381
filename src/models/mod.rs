// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod headline;

// Re-export all public types
pub use config::{
    Config, ExtractConfig, FallbackPolicy, PathsConfig, PublishConfig, SourceConfig, Strategy,
    WatchConfig,
};
pub use headline::EmittedHeadline;
