// src/storage/emission_log.rs
//! Append-only CSV log of every emitted headline.
//!
//! One row per emission: RFC 3339 timestamp, then the exact emitted text.
//! The log doubles as restart memory: its texts re-seed the novelty
//! tracker so a restart does not replay items already emitted.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::EmittedHeadline;

use super::ensure_parent_dir;

pub struct EmissionLog {
    path: PathBuf,
}

impl EmissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one emission as a CSV row.
    pub fn append(&self, headline: &EmittedHeadline) -> Result<()> {
        ensure_parent_dir(&self.path).map_err(|e| self.persist_err(e))?;

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.persist_err(e))?;

        let mut writer = csv::Writer::from_writer(file);
        let stamp = headline.emitted_at.to_rfc3339();
        writer.write_record([stamp.as_str(), headline.text.as_str()])?;
        writer.flush()?;
        Ok(())
    }

    /// Read the whole log. Rows that no longer parse are skipped with a
    /// warning, so one corrupt line cannot block startup.
    pub fn read_all(&self) -> Result<Vec<EmittedHeadline>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.persist_err(e)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut headlines = Vec::new();
        for row in reader.records() {
            let record = match row {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping unreadable emission row: {}", e);
                    continue;
                }
            };
            let (Some(stamp), Some(text)) = (record.get(0), record.get(1)) else {
                log::warn!("Skipping short emission row: {:?}", record);
                continue;
            };
            let emitted_at = match DateTime::parse_from_rfc3339(stamp) {
                Ok(parsed) => parsed.with_timezone(&Utc),
                Err(e) => {
                    log::warn!("Skipping emission row with bad timestamp {:?}: {}", stamp, e);
                    continue;
                }
            };
            headlines.push(EmittedHeadline {
                emitted_at,
                text: text.to_string(),
            });
        }
        Ok(headlines)
    }

    /// Just the emitted texts, for seeding the novelty tracker.
    pub fn emitted_texts(&self) -> Result<Vec<String>> {
        Ok(self.read_all()?.into_iter().map(|h| h.text).collect())
    }

    fn persist_err(&self, source: impl fmt::Display) -> AppError {
        AppError::persistence(self.path.display().to_string(), source)
    }
}
