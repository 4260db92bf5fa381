// src/pipeline/rate_limit.rs
//! Rolling-window cap on outbound publish attempts.
//!
//! Every recorded attempt is timestamped and persisted through the usage
//! ledger, so the window survives restarts. Entries older than the window
//! are pruned on each check; the limiter counts attempts, successful or
//! not, never items inside a payload.

use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::storage::UsageLedger;

pub struct RateLimiter {
    ledger: UsageLedger,
    max_attempts: usize,
    window: Duration,
    attempts: VecDeque<f64>,
}

impl RateLimiter {
    /// Restore the attempt history from the ledger. A missing or unreadable
    /// ledger yields an empty history.
    pub fn new(ledger: UsageLedger, max_attempts: usize, window: Duration) -> Self {
        let mut stamps = ledger.load();
        stamps.sort_by(f64::total_cmp);
        Self {
            ledger,
            max_attempts,
            window,
            attempts: VecDeque::from(stamps),
        }
    }

    /// Whether another publish attempt is allowed right now. Does not
    /// consume an attempt.
    pub fn can_post(&mut self) -> bool {
        self.prune();
        self.attempts.len() < self.max_attempts
    }

    /// Record one publish attempt and persist the pruned history.
    pub fn record_post(&mut self) -> Result<()> {
        self.attempts.push_back(epoch_seconds());
        self.prune();
        self.ledger.save(self.attempts.make_contiguous())
    }

    /// Attempts currently inside the rolling window.
    pub fn attempts_in_window(&mut self) -> usize {
        self.prune();
        self.attempts.len()
    }

    /// Drop timestamps strictly older than the window.
    fn prune(&mut self) {
        let now = epoch_seconds();
        let window = self.window.as_secs_f64();
        while let Some(&oldest) = self.attempts.front() {
            if now - oldest > window {
                self.attempts.pop_front();
            } else {
                break;
            }
        }
    }
}

fn epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use tempfile::TempDir;

    fn limiter_at(dir: &TempDir, max_attempts: usize, window: Duration) -> RateLimiter {
        let ledger = UsageLedger::new(dir.path().join("usage.json"));
        RateLimiter::new(ledger, max_attempts, window)
    }

    #[test]
    fn missing_ledger_starts_with_a_clean_window() {
        let dir = TempDir::new().unwrap();
        let mut limiter = limiter_at(&dir, 3, Duration::from_secs(60));

        assert!(limiter.can_post());
        assert_eq!(limiter.attempts_in_window(), 0);
    }

    #[test]
    fn can_post_does_not_consume_an_attempt() {
        let dir = TempDir::new().unwrap();
        let mut limiter = limiter_at(&dir, 1, Duration::from_secs(60));

        assert!(limiter.can_post());
        assert!(limiter.can_post());
        assert_eq!(limiter.attempts_in_window(), 0);
    }

    #[test]
    fn blocks_once_the_cap_is_reached() {
        let dir = TempDir::new().unwrap();
        let mut limiter = limiter_at(&dir, 2, Duration::from_secs(60));

        limiter.record_post().unwrap();
        assert!(limiter.can_post());
        limiter.record_post().unwrap();

        assert!(!limiter.can_post());
        assert_eq!(limiter.attempts_in_window(), 2);
    }

    #[test]
    fn expired_attempts_free_the_window() {
        let dir = TempDir::new().unwrap();
        let mut limiter = limiter_at(&dir, 1, Duration::from_millis(300));

        limiter.record_post().unwrap();
        assert!(!limiter.can_post());

        sleep(Duration::from_millis(400));
        assert!(limiter.can_post());
        assert_eq!(limiter.attempts_in_window(), 0);
    }

    #[test]
    fn history_survives_a_restart() {
        let dir = TempDir::new().unwrap();

        {
            let mut limiter = limiter_at(&dir, 2, Duration::from_secs(60));
            limiter.record_post().unwrap();
            limiter.record_post().unwrap();
        }

        let mut restarted = limiter_at(&dir, 2, Duration::from_secs(60));
        assert!(!restarted.can_post());
        assert_eq!(restarted.attempts_in_window(), 2);
    }
}
