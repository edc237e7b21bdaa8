//! CLI argument parsing for upkeep.
//!
//! The normal invocation is argument-free: `sudo upkeep`. Flags exist for
//! dry runs and for relocating the artifacts in tests.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "upkeep")]
#[command(about = "Routine Linux system maintenance and audit runs")]
#[command(long_about = "Routine Linux system maintenance and audit runs.\n\n\
    Runs a fixed plan: package upgrade, orphan removal, cache cleanup,\n\
    optional tool updates (flatpak/snap), journal vacuuming, config backup,\n\
    and audit reports (firewall, rootkits, zombies, largest files).\n\
    Individual step failures never abort the run; the exit code is only\n\
    non-zero when preflight fails before any step runs.")]
pub struct Cli {
    /// Log every command instead of executing it
    #[arg(long)]
    pub dry_run: bool,

    /// Where to write the JSON run report
    #[arg(long)]
    pub report_path: Option<PathBuf>,

    /// Days to keep old logs and backup sets
    #[arg(long, default_value_t = upkeep_core::retention::DEFAULT_RETENTION_DAYS)]
    pub retention_days: u64,

    /// Suppress desktop notifications
    #[arg(long)]
    pub no_notify: bool,
}
