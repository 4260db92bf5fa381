// src/pipeline/watch.rs
//! Watch loop state machine.
//!
//! The loop cycles through attach, poll, and backoff states until it is
//! cancelled or the source stays unreachable past the attach retry cap.
//! A snapshot-level failure never kills the loop: the watcher backs off,
//! re-attaches, and keeps its seen-set, so items from before an outage
//! are still recognized as old afterwards.

use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::extract::{ExtractStrategy, build_extractor};
use crate::models::{Config, EmittedHeadline};
use crate::services::{AlertHook, PublishSink, SnapshotSource};
use crate::storage::{EmissionLog, UsageLedger};

use super::aggregate::AggregationBuffer;
use super::novelty::NoveltyTracker;
use super::rate_limit::RateLimiter;

/// Lifecycle states of the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// No live source; attach attempts happen here
    Disconnected,
    /// Source verified, polling starts next
    Attached,
    /// Steady-state snapshot/extract/publish cycling
    Polling,
    /// Waiting out the backoff before re-attaching
    ErrorBackoff,
    /// Final state, the loop exits
    Terminated,
}

/// Why a finished watch run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// External cancellation, e.g. Ctrl-C
    Cancelled,
    /// Attach retries were exhausted
    SourceLost,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "stop signal"),
            Self::SourceLost => write!(f, "source lost"),
        }
    }
}

/// Counters accumulated over one watch run.
#[derive(Debug, Clone, Default)]
pub struct WatchSummary {
    /// Completed poll cycles, including failed ones
    pub cycles: u64,
    /// Items confirmed new and recorded
    pub emitted: u64,
    /// Aggregated payloads delivered to the sink
    pub published: u64,
    /// Payloads the sink rejected
    pub publish_failures: u64,
    /// Payloads dropped by the rate limiter
    pub rate_limited: u64,
    /// Times the loop fell back to re-attaching after a lost source
    pub reattaches: u64,
    /// Set once the loop terminates
    pub stop_reason: Option<StopReason>,
}

/// Drives one source through the detect/aggregate/publish pipeline.
pub struct Watcher {
    source: Box<dyn SnapshotSource>,
    extractor: Box<dyn ExtractStrategy>,
    sink: Box<dyn PublishSink>,
    alert: Box<dyn AlertHook>,
    tracker: NoveltyTracker,
    buffer: AggregationBuffer,
    limiter: RateLimiter,
    emission_log: EmissionLog,
    poll_interval: Duration,
    backoff: Duration,
    max_attach_attempts: u32,
    state: WatchState,
}

impl Watcher {
    /// Assemble the pipeline around the given source and sink, priming the
    /// novelty tracker from the emission log on disk.
    pub fn new(
        config: &Config,
        source: Box<dyn SnapshotSource>,
        sink: Box<dyn PublishSink>,
        alert: Box<dyn AlertHook>,
    ) -> Result<Self> {
        let extractor = build_extractor(&config.extract)?;
        let emission_log = EmissionLog::new(config.paths.emission_log.clone());
        let ledger = UsageLedger::new(config.paths.usage_ledger.clone());
        let limiter = RateLimiter::new(
            ledger,
            config.publish.max_attempts,
            config.publish.window(),
        );

        let mut tracker = NoveltyTracker::new();
        let primed = tracker.prime(emission_log.emitted_texts()?);
        if primed > 0 {
            log::info!("Primed with {} previously emitted item(s)", primed);
        }

        Ok(Self {
            source,
            extractor,
            sink,
            alert,
            tracker,
            buffer: AggregationBuffer::new(config.watch.quiet_period()),
            limiter,
            emission_log,
            poll_interval: config.watch.poll_interval(),
            backoff: config.watch.backoff(),
            max_attach_attempts: config.watch.max_attach_attempts,
            state: WatchState::Disconnected,
        })
    }

    /// Current position in the state machine.
    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Run the state machine until cancellation or loss of the source.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<WatchSummary> {
        let mut summary = WatchSummary::default();
        let mut attach_failures: u32 = 0;

        log::info!(
            "Watching {} ({} strategy)",
            self.source.describe(),
            self.extractor.name()
        );

        loop {
            if cancel.is_cancelled() && self.state != WatchState::Terminated {
                log::info!("Stop signal received, shutting down");
                summary.stop_reason = Some(StopReason::Cancelled);
                self.state = WatchState::Terminated;
            }

            match self.state {
                WatchState::Disconnected => match self.source.attach().await {
                    Ok(()) => {
                        attach_failures = 0;
                        self.state = WatchState::Attached;
                    }
                    Err(e) => {
                        attach_failures += 1;
                        if attach_failures >= self.max_attach_attempts {
                            log::error!(
                                "Giving up after {} failed attach attempt(s): {}",
                                attach_failures,
                                e
                            );
                            summary.stop_reason = Some(StopReason::SourceLost);
                            self.state = WatchState::Terminated;
                        } else {
                            log::warn!(
                                "Attach attempt {}/{} failed: {}",
                                attach_failures,
                                self.max_attach_attempts,
                                e
                            );
                            sleep_or_cancel(self.backoff, &cancel).await;
                        }
                    }
                },
                WatchState::Attached => {
                    log::info!("Attached to {}", self.source.describe());
                    self.state = WatchState::Polling;
                }
                WatchState::Polling => {
                    summary.cycles += 1;
                    match self.poll_once(&mut summary).await {
                        Ok(()) => sleep_or_cancel(self.poll_interval, &cancel).await,
                        Err(e) if e.needs_reattach() => {
                            log::warn!("Lost the source mid-poll: {}", e);
                            self.state = WatchState::ErrorBackoff;
                        }
                        Err(e) => {
                            log::warn!("Poll cycle skipped: {}", e);
                            sleep_or_cancel(self.poll_interval, &cancel).await;
                        }
                    }
                }
                WatchState::ErrorBackoff => {
                    sleep_or_cancel(self.backoff, &cancel).await;
                    summary.reattaches += 1;
                    self.state = WatchState::Disconnected;
                }
                WatchState::Terminated => break,
            }
        }

        if !self.buffer.is_empty() {
            log::warn!(
                "{} aggregated item(s) left unpublished at shutdown",
                self.buffer.len()
            );
        }
        log::debug!("Seen-set holds {} item(s)", self.tracker.seen_count());
        if let Some(reason) = summary.stop_reason {
            log::info!(
                "Watch finished ({}): {} cycles, {} new, {} published",
                reason,
                summary.cycles,
                summary.emitted,
                summary.published
            );
        }

        Ok(summary)
    }

    /// One snapshot/extract/dedupe/aggregate/publish cycle.
    ///
    /// Source and extraction failures propagate to the state machine;
    /// persistence and publish failures are absorbed here.
    async fn poll_once(&mut self, summary: &mut WatchSummary) -> Result<()> {
        let snapshot = self.source.snapshot().await?;
        log::debug!("Snapshot fetched ({} bytes)", snapshot.len());

        let candidates = self.extractor.extract(&snapshot)?;
        let fresh = self.tracker.filter_new(candidates);

        if !fresh.is_empty() {
            log::info!("{} new item(s) detected", fresh.len());
            self.alert.notify(fresh.len());
        }

        for text in fresh {
            log::info!("NEW: {}", text);
            let headline = EmittedHeadline::now(text);
            if let Err(e) = self.emission_log.append(&headline) {
                log::error!("Could not record emission: {}", e);
            }
            self.buffer.add(headline.text);
            summary.emitted += 1;
        }

        if self.buffer.should_flush() {
            let pending = self.buffer.len();
            let payload = self.buffer.flush();
            if self.limiter.can_post() {
                if let Err(e) = self.limiter.record_post() {
                    log::error!("Could not persist the usage ledger: {}", e);
                }
                match self.sink.publish(&payload).await {
                    Ok(()) => {
                        summary.published += 1;
                        log::info!("Published {} item(s)", pending);
                    }
                    Err(e) => {
                        summary.publish_failures += 1;
                        log::warn!("Publish failed, dropping {} item(s): {}", pending, e);
                    }
                }
            } else {
                summary.rate_limited += 1;
                log::warn!(
                    "Publish window exhausted ({} recent attempt(s)), dropping {} item(s)",
                    self.limiter.attempts_in_window(),
                    pending
                );
            }
        }

        Ok(())
    }
}

/// Sleep that wakes early when the token fires.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) {
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = cancel.cancelled() => {}
    }
}
