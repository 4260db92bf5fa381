//! Service layer for the watcher application.
//!
//! This module contains the I/O boundaries:
//! - Snapshot sources (`SnapshotSource`, `PageSource`)
//! - Publish sinks (`PublishSink`, `WebhookSink`, `StdoutSink`)
//! - Alert hooks (`AlertHook`, `TerminalBell`)

mod alert;
mod publish;
mod source;

pub use alert::{AlertHook, NoopAlert, TerminalBell};
pub use publish::{PublishSink, StdoutSink, WebhookSink};
pub use source::{PageSource, SnapshotSource};
