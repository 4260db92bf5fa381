// src/storage/ledger.rs
//! JSON ledger of publish-attempt timestamps (epoch seconds).

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

use super::write_atomic;

pub struct UsageLedger {
    path: PathBuf,
}

impl UsageLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the recorded timestamps. A missing or unreadable ledger loads
    /// as empty so the rate limiter fails open rather than blocking.
    pub fn load(&self) -> Vec<f64> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("Usage ledger unreadable at {:?}: {}", self.path, e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(stamps) => stamps,
            Err(e) => {
                log::warn!("Usage ledger corrupt at {:?}, starting fresh: {}", self.path, e);
                Vec::new()
            }
        }
    }

    /// Replace the ledger contents atomically.
    pub fn save(&self, stamps: &[f64]) -> Result<()> {
        let bytes = serde_json::to_vec(stamps)?;
        write_atomic(&self.path, &bytes).map_err(|e| self.persist_err(e))
    }

    fn persist_err(&self, source: impl fmt::Display) -> AppError {
        AppError::persistence(self.path.display().to_string(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_at(dir: &TempDir) -> UsageLedger {
        UsageLedger::new(dir.path().join("usage.json"))
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_at(&dir);

        ledger.save(&[1000.5, 2000.25, 3000.0]).unwrap();
        assert_eq!(ledger.load(), vec![1000.5, 2000.25, 3000.0]);
    }

    #[test]
    fn missing_ledger_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        assert!(ledger_at(&dir).load().is_empty());
    }

    #[test]
    fn corrupt_ledger_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_at(&dir);

        fs::write(ledger.path(), "{ not json").unwrap();
        assert!(ledger.load().is_empty());
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_at(&dir);

        ledger.save(&[1.0, 2.0]).unwrap();
        ledger.save(&[3.0]).unwrap();
        assert_eq!(ledger.load(), vec![3.0]);
    }
}
