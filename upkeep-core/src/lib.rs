//! Upkeep core library.
//!
//! `upkeep-core` holds the maintenance-run orchestrator and its
//! collaborators: the run report, package backends, kernel queries,
//! config backup, log retention, and the desktop notifier. Binaries wire
//! these together on top of `upkeep-hal`.

pub mod backup;
pub mod context;
pub mod kernel;
pub mod logging;
pub mod notify;
pub mod pkg;
pub mod preflight;
pub mod reports;
pub mod retention;
pub mod run_report;
pub mod runner;
pub mod steps;
