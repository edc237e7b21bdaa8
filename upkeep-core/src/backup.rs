//! Config file backup.
//!
//! Copies a fixed set of system configuration files into a fresh
//! timestamped directory under the backup root. Missing sources are
//! skipped; copy failures make the step fail (recorded, non-fatal to the
//! run).

use crate::run_report::now_unix_ms;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_BACKUP_ROOT: &str = "/var/backups/upkeep";

pub fn default_sources() -> Vec<PathBuf> {
    [
        "/etc/fstab",
        "/etc/hosts",
        "/etc/hostname",
        "/etc/resolv.conf",
        "/etc/ssh/sshd_config",
        "/etc/sudoers",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub sources: Vec<PathBuf>,
    pub dest_root: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            dest_root: PathBuf::from(DEFAULT_BACKUP_ROOT),
        }
    }
}

/// Flatten an absolute source path into a single file name:
/// `/etc/ssh/sshd_config` -> `etc_ssh_sshd_config`.
pub fn flatten_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("_")
}

pub fn run(cfg: &BackupConfig) -> Result<Option<String>> {
    let dest = cfg.dest_root.join(format!("config-{}", now_unix_ms()));
    fs::create_dir_all(&dest)
        .with_context(|| format!("failed to create backup directory {}", dest.display()))?;

    let mut copied = 0usize;
    let mut missing = 0usize;
    let mut failed = 0usize;
    for src in &cfg.sources {
        if !src.exists() {
            log::info!("backup: {} not present, skipping", src.display());
            missing += 1;
            continue;
        }
        let target = dest.join(flatten_name(src));
        match fs::copy(src, &target) {
            Ok(_) => copied += 1,
            Err(err) => {
                log::warn!("backup: could not copy {}: {err}", src.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!(
            "backed up {} of {} files to {} ({} failed)",
            copied,
            cfg.sources.len(),
            dest.display(),
            failed
        );
    }
    Ok(Some(format!(
        "backed up {copied} files to {} ({missing} sources absent)",
        dest.display()
    )))
}
