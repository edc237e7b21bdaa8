//! Run-scoped context passed to the orchestrator and every step.
//!
//! Replaces the ambient globals a shell implementation would use (log
//! redirection, color state, detected package manager) with one explicit
//! value.

use crate::kernel;
use crate::notify::Notifier;
use crate::pkg::PackageBackend;
use crate::run_report::RunReportWriter;
use std::path::PathBuf;
use std::sync::Arc;
use upkeep_hal::SystemHal;

pub struct RunContext {
    pub hal: Arc<dyn SystemHal>,
    pub backend: Arc<dyn PackageBackend>,
    pub notifier: Notifier,
    pub report_writer: RunReportWriter,
    pub dry_run: bool,
    /// Where installed kernels are looked up. Overridable for tests.
    pub modules_dirs: Vec<PathBuf>,
}

impl RunContext {
    pub fn new(
        hal: Arc<dyn SystemHal>,
        backend: Arc<dyn PackageBackend>,
        notifier: Notifier,
        report_writer: RunReportWriter,
        dry_run: bool,
    ) -> Self {
        Self {
            hal,
            backend,
            notifier,
            report_writer,
            dry_run,
            modules_dirs: kernel::default_modules_dirs(),
        }
    }
}
