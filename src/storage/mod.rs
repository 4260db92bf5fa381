//! Persisted watch state.
//!
//! Two files survive restarts:
//! - `EmissionLog`: append-only CSV, one row per emitted headline
//! - `UsageLedger`: JSON array of publish-attempt timestamps

pub mod emission_log;
pub mod ledger;

pub use emission_log::EmissionLog;
pub use ledger::UsageLedger;

use std::fs;
use std::io::Write;
use std::path::Path;

/// Create the parent directory when the path has a non-trivial one.
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        // parent() of a bare filename is Some("")
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Write bytes atomically (write to temp, then rename).
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    ensure_parent_dir(path)?;

    let tmp = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp)?;
    file.write_all(bytes)?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state/nested/usage.json");

        write_atomic(&path, b"[]").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn write_atomic_replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");

        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn bare_filename_needs_no_directory() {
        assert!(ensure_parent_dir(Path::new("usage.json")).is_ok());
    }
}
