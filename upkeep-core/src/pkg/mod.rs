//! Package-manager backends.
//!
//! One backend is selected at startup from what is installed and reused
//! for the whole run; steps never re-detect. Command argv is built by
//! plain spec functions so it can be unit-tested without executing
//! anything.

pub mod apt;
pub mod dnf;
pub mod pacman;

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;
use upkeep_hal::SystemHal;

pub use apt::Apt;
pub use dnf::Dnf;
pub use pacman::Pacman;

pub(crate) const UPGRADE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
pub(crate) const ORPHANS_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub(crate) const CLEAN_TIMEOUT: Duration = Duration::from_secs(10 * 60);

pub trait PackageBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Refresh metadata and upgrade every installed package.
    fn upgrade_all(&self) -> Result<Option<String>>;

    /// Remove packages nothing depends on anymore.
    fn remove_orphans(&self) -> Result<Option<String>>;

    /// Drop the package cache.
    fn clean_cache(&self) -> Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.program, self.args.join(" "))
    }
}

pub(crate) fn run_spec(
    hal: &Arc<dyn SystemHal>,
    spec: &CommandSpec,
    timeout: Duration,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        log::info!("DRY RUN: {spec}");
        return Ok(());
    }
    let args: Vec<&str> = spec.args.iter().map(String::as_str).collect();
    hal.command_status(&spec.program, &args, timeout)?;
    Ok(())
}

/// Pick the package backend once, at startup.
pub fn detect(hal: &Arc<dyn SystemHal>, dry_run: bool) -> Result<Arc<dyn PackageBackend>> {
    if hal.tool_available("dnf") {
        return Ok(Arc::new(Dnf::new(Arc::clone(hal), dry_run)));
    }
    if hal.tool_available("apt-get") {
        return Ok(Arc::new(Apt::new(Arc::clone(hal), dry_run)));
    }
    if hal.tool_available("pacman") {
        return Ok(Arc::new(Pacman::new(Arc::clone(hal), dry_run)));
    }
    bail!("no supported package manager found (need dnf, apt-get, or pacman)")
}
