//! Arch backend (pacman).

use super::{run_spec, CommandSpec, PackageBackend, CLEAN_TIMEOUT, ORPHANS_TIMEOUT, UPGRADE_TIMEOUT};
use anyhow::Result;
use std::sync::Arc;
use upkeep_hal::SystemHal;

pub struct Pacman {
    hal: Arc<dyn SystemHal>,
    dry_run: bool,
}

impl Pacman {
    pub fn new(hal: Arc<dyn SystemHal>, dry_run: bool) -> Self {
        Self { hal, dry_run }
    }
}

pub fn upgrade_spec() -> CommandSpec {
    CommandSpec::new("pacman", &["-Syu", "--noconfirm"])
}

pub fn orphan_query_spec() -> CommandSpec {
    CommandSpec::new("pacman", &["-Qtdq"])
}

pub fn remove_spec(pkgs: &[String]) -> CommandSpec {
    let mut args = vec!["-Rns".to_string(), "--noconfirm".to_string()];
    args.extend(pkgs.iter().cloned());
    CommandSpec {
        program: "pacman".to_string(),
        args,
    }
}

pub fn clean_spec() -> CommandSpec {
    CommandSpec::new("pacman", &["-Sc", "--noconfirm"])
}

/// One package name per line; `pacman -Qtdq` exits non-zero when there are
/// no orphans, so callers treat a failed query as an empty list.
pub fn parse_orphans(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl PackageBackend for Pacman {
    fn name(&self) -> &'static str {
        "pacman"
    }

    fn upgrade_all(&self) -> Result<Option<String>> {
        run_spec(&self.hal, &upgrade_spec(), UPGRADE_TIMEOUT, self.dry_run)?;
        Ok(None)
    }

    fn remove_orphans(&self) -> Result<Option<String>> {
        let query = orphan_query_spec();
        if self.dry_run {
            log::info!("DRY RUN: {query}, then -Rns --noconfirm on the result");
            return Ok(None);
        }
        let args: Vec<&str> = query.args.iter().map(String::as_str).collect();
        let output = self
            .hal
            .command_output(&query.program, &args, ORPHANS_TIMEOUT)?;
        if !output.status.success() {
            return Ok(Some("no orphaned packages".to_string()));
        }
        let orphans = parse_orphans(&String::from_utf8_lossy(&output.stdout));
        if orphans.is_empty() {
            return Ok(Some("no orphaned packages".to_string()));
        }
        run_spec(&self.hal, &remove_spec(&orphans), ORPHANS_TIMEOUT, self.dry_run)?;
        Ok(Some(format!("removed {} orphaned packages", orphans.len())))
    }

    fn clean_cache(&self) -> Result<Option<String>> {
        run_spec(&self.hal, &clean_spec(), CLEAN_TIMEOUT, self.dry_run)?;
        Ok(None)
    }
}
