//! Fedora / RPM backend (dnf).

use super::{
    run_spec, CommandSpec, PackageBackend, CLEAN_TIMEOUT, ORPHANS_TIMEOUT, UPGRADE_TIMEOUT,
};
use anyhow::Result;
use std::sync::Arc;
use upkeep_hal::SystemHal;

pub struct Dnf {
    hal: Arc<dyn SystemHal>,
    dry_run: bool,
}

impl Dnf {
    pub fn new(hal: Arc<dyn SystemHal>, dry_run: bool) -> Self {
        Self { hal, dry_run }
    }
}

pub fn upgrade_spec() -> CommandSpec {
    CommandSpec::new("dnf", &["upgrade", "--refresh", "-y"])
}

pub fn autoremove_spec() -> CommandSpec {
    CommandSpec::new("dnf", &["autoremove", "-y"])
}

pub fn clean_spec() -> CommandSpec {
    CommandSpec::new("dnf", &["clean", "all"])
}

impl PackageBackend for Dnf {
    fn name(&self) -> &'static str {
        "dnf"
    }

    fn upgrade_all(&self) -> Result<Option<String>> {
        run_spec(&self.hal, &upgrade_spec(), UPGRADE_TIMEOUT, self.dry_run)?;
        Ok(None)
    }

    fn remove_orphans(&self) -> Result<Option<String>> {
        run_spec(&self.hal, &autoremove_spec(), ORPHANS_TIMEOUT, self.dry_run)?;
        Ok(None)
    }

    fn clean_cache(&self) -> Result<Option<String>> {
        run_spec(&self.hal, &clean_spec(), CLEAN_TIMEOUT, self.dry_run)?;
        Ok(None)
    }
}
