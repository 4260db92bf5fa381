// src/services/alert.rs

//! Local alert hooks fired when new items are confirmed.

use std::io::Write;

/// Side-channel notification that new items appeared in a cycle.
pub trait AlertHook: Send + Sync {
    fn notify(&self, new_items: usize);
}

/// Rings the terminal bell.
pub struct TerminalBell;

impl AlertHook for TerminalBell {
    fn notify(&self, _new_items: usize) {
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}

/// Silent hook for headless runs.
pub struct NoopAlert;

impl AlertHook for NoopAlert {
    fn notify(&self, _new_items: usize) {}
}
