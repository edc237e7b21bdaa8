//! Host information (read-only).
//!
//! This is "world-touching" (reads `/proc`, `/etc`, process credentials)
//! and belongs in the HAL.

use crate::HalResult;

pub trait HostInfoOps {
    fn hostname(&self) -> HalResult<Option<String>>;

    /// Release string of the currently running kernel (`uname -r` semantics).
    fn kernel_release(&self) -> HalResult<Option<String>>;

    /// Effective uid of the current process.
    fn effective_uid(&self) -> u32;
}
