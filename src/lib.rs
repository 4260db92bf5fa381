// src/lib.rs

//! Feed watcher library: polls a text source and republishes what is new.

pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
