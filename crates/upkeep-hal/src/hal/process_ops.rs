//! Process execution helpers.
//!
//! Maintenance runs in privileged contexts; external commands must go
//! through the HAL with an explicit timeout so workflows can be tested
//! without spawning real processes and a stuck tool cannot hang forever.

use crate::HalResult;
use std::process::Output;
use std::time::Duration;

/// Process execution trait (external command runner).
pub trait ProcessOps {
    /// Run a command and capture its output. A non-zero exit status is not
    /// an error here; callers inspect `Output::status`.
    fn command_output(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Output>;

    /// Run a command and require a successful exit status.
    fn command_status(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<()>;
}
