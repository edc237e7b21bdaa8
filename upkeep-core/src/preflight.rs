//! Preflight checks.
//!
//! The only way a run exits non-zero: these run before any step, and any
//! failure here aborts the process. Once preflight passes, individual step
//! failures are report data, never exit codes.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use upkeep_hal::SystemHal;

const SUPPORTED_MANAGERS: &[&str] = &["dnf", "apt-get", "pacman"];

#[derive(Debug, Clone)]
pub struct PreflightConfig {
    pub require_root: bool,
    /// Create the log/backup directories. Off for dry runs, which must
    /// not touch the filesystem (and may lack the privileges to).
    pub prepare_dirs: bool,
    pub log_dir: PathBuf,
    pub backup_root: PathBuf,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            require_root: true,
            prepare_dirs: true,
            log_dir: PathBuf::from(crate::logging::DEFAULT_LOG_DIR),
            backup_root: PathBuf::from(crate::backup::DEFAULT_BACKUP_ROOT),
        }
    }
}

pub fn run(cfg: &PreflightConfig, hal: &Arc<dyn SystemHal>) -> Result<()> {
    log::info!("🧪 Preflight checks");

    if cfg.require_root {
        let euid = hal.effective_uid();
        if euid != 0 {
            bail!("upkeep must run as root (effective uid {euid})");
        }
    }

    if cfg.prepare_dirs {
        fs::create_dir_all(&cfg.log_dir)
            .with_context(|| format!("unable to create log directory {}", cfg.log_dir.display()))?;
        fs::create_dir_all(&cfg.backup_root).with_context(|| {
            format!(
                "unable to create backup directory {}",
                cfg.backup_root.display()
            )
        })?;
    }

    if !SUPPORTED_MANAGERS.iter().any(|m| hal.tool_available(m)) {
        bail!(
            "no supported package manager on PATH (looked for {})",
            SUPPORTED_MANAGERS.join(", ")
        );
    }

    log::info!("✅ Preflight complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use upkeep_hal::FakeHal;

    fn base_config(tmp: &std::path::Path) -> PreflightConfig {
        PreflightConfig {
            require_root: true,
            prepare_dirs: true,
            log_dir: tmp.join("log"),
            backup_root: tmp.join("backups"),
        }
    }

    #[test]
    fn fails_without_root() {
        let tmp = tempdir().unwrap();
        let fake = FakeHal::new();
        fake.set_effective_uid(1000);
        fake.set_tool_available("dnf");
        let hal: Arc<dyn SystemHal> = Arc::new(fake);

        let err = run(&base_config(tmp.path()), &hal).unwrap_err();
        assert!(err.to_string().contains("must run as root"));
    }

    #[test]
    fn fails_without_a_package_manager() {
        let tmp = tempdir().unwrap();
        let hal: Arc<dyn SystemHal> = Arc::new(FakeHal::new());

        let err = run(&base_config(tmp.path()), &hal).unwrap_err();
        assert!(err.to_string().contains("no supported package manager"));
    }

    #[test]
    fn passes_and_creates_directories() {
        let tmp = tempdir().unwrap();
        let fake = FakeHal::new();
        fake.set_tool_available("pacman");
        let hal: Arc<dyn SystemHal> = Arc::new(fake);

        let cfg = base_config(tmp.path());
        run(&cfg, &hal).unwrap();
        assert!(cfg.log_dir.is_dir());
        assert!(cfg.backup_root.is_dir());
    }

    #[test]
    fn preview_mode_leaves_the_filesystem_alone() {
        let tmp = tempdir().unwrap();
        let fake = FakeHal::new();
        fake.set_tool_available("dnf");
        let hal: Arc<dyn SystemHal> = Arc::new(fake);

        // Parent is a file, so any create_dir_all attempt would fail.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut cfg = PreflightConfig {
            require_root: false,
            prepare_dirs: false,
            log_dir: blocker.join("log"),
            backup_root: blocker.join("backups"),
        };
        run(&cfg, &hal).unwrap();

        cfg.prepare_dirs = true;
        let err = run(&cfg, &hal).unwrap_err();
        assert!(err.to_string().contains("unable to create log directory"));
    }

    #[test]
    fn root_check_can_be_waived_for_tests() {
        let tmp = tempdir().unwrap();
        let fake = FakeHal::new();
        fake.set_effective_uid(1000);
        fake.set_tool_available("apt-get");
        let hal: Arc<dyn SystemHal> = Arc::new(fake);

        let mut cfg = base_config(tmp.path());
        cfg.require_root = false;
        run(&cfg, &hal).unwrap();
    }
}
