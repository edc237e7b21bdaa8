//! Upkeep system abstraction layer.
//!
//! Everything "world-touching" — spawning external tools, probing what is
//! installed, reading host facts — goes through the traits in this crate so
//! the maintenance workflow can be exercised in tests without root
//! privileges or a real package manager.

mod error;
pub mod hal;

pub use error::{HalError, HalResult};
pub use hal::{FakeHal, HostInfoOps, LinuxHal, Operation, ProbeOps, ProcessOps, SystemHal};
