//! Debian / Ubuntu backend (apt-get).

use super::{
    run_spec, CommandSpec, PackageBackend, CLEAN_TIMEOUT, ORPHANS_TIMEOUT, UPGRADE_TIMEOUT,
};
use anyhow::Result;
use std::sync::Arc;
use upkeep_hal::SystemHal;

pub struct Apt {
    hal: Arc<dyn SystemHal>,
    dry_run: bool,
}

impl Apt {
    pub fn new(hal: Arc<dyn SystemHal>, dry_run: bool) -> Self {
        Self { hal, dry_run }
    }
}

pub fn update_spec() -> CommandSpec {
    CommandSpec::new("apt-get", &["update"])
}

pub fn full_upgrade_spec() -> CommandSpec {
    CommandSpec::new("apt-get", &["full-upgrade", "-y"])
}

pub fn autoremove_spec() -> CommandSpec {
    CommandSpec::new("apt-get", &["autoremove", "--purge", "-y"])
}

pub fn autoclean_spec() -> CommandSpec {
    CommandSpec::new("apt-get", &["autoclean", "-y"])
}

impl PackageBackend for Apt {
    fn name(&self) -> &'static str {
        "apt"
    }

    fn upgrade_all(&self) -> Result<Option<String>> {
        // Metadata refresh is a separate command on Debian.
        run_spec(&self.hal, &update_spec(), UPGRADE_TIMEOUT, self.dry_run)?;
        run_spec(&self.hal, &full_upgrade_spec(), UPGRADE_TIMEOUT, self.dry_run)?;
        Ok(None)
    }

    fn remove_orphans(&self) -> Result<Option<String>> {
        run_spec(&self.hal, &autoremove_spec(), ORPHANS_TIMEOUT, self.dry_run)?;
        Ok(None)
    }

    fn clean_cache(&self) -> Result<Option<String>> {
        run_spec(&self.hal, &autoclean_spec(), CLEAN_TIMEOUT, self.dry_run)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upkeep_hal::FakeHal;

    #[test]
    fn specs_build_expected_argv() {
        assert_eq!(update_spec().args, vec!["update"]);
        assert_eq!(full_upgrade_spec().args, vec!["full-upgrade", "-y"]);
        assert_eq!(autoremove_spec().args, vec!["autoremove", "--purge", "-y"]);
        assert_eq!(autoclean_spec().args, vec!["autoclean", "-y"]);
    }

    #[test]
    fn upgrade_refreshes_then_upgrades() {
        let fake = FakeHal::new();
        let backend = Apt::new(Arc::new(fake.clone()), false);
        backend.upgrade_all().unwrap();
        assert_eq!(fake.invoked_programs(), vec!["apt-get", "apt-get"]);
    }

    #[test]
    fn failed_update_stops_before_upgrade() {
        let fake = FakeHal::new();
        fake.fail_command("apt-get");
        let backend = Apt::new(Arc::new(fake.clone()), false);
        assert!(backend.upgrade_all().is_err());
        assert_eq!(fake.invoked_programs().len(), 1);
    }
}
