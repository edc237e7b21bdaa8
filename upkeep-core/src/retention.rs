//! Retention pruning for logs and backups.
//!
//! Runs once at startup, before any step. Entries older than the retention
//! window are deleted; directories (timestamped backup sets) are removed
//! whole.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

pub const DEFAULT_RETENTION_DAYS: u64 = 14;

pub fn retention_window(days: u64) -> Duration {
    Duration::from_secs(days * 24 * 60 * 60)
}

/// Remove entries in `dir` whose modification time is older than
/// `older_than`. A missing directory is not an error. Returns the number
/// of entries removed.
pub fn prune(dir: &Path, older_than: Duration) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let now = SystemTime::now();
    let mut removed = 0;
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => continue,
        };
        let age = now.duration_since(modified).unwrap_or_default();
        if age < older_than {
            continue;
        }
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => {
                log::info!("🧹 pruned {}", path.display());
                removed += 1;
            }
            Err(err) => log::warn!("could not prune {}: {err}", path.display()),
        }
    }
    Ok(removed)
}
