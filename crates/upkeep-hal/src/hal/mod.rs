//! HAL trait definitions and implementations.
//!
//! Defines the traits for system interactions and provides both a real
//! (`LinuxHal`) and a recording fake (`FakeHal`) implementation.

pub mod fake_hal;
pub mod host_info_ops;
pub mod linux_hal;
pub mod probe_ops;
pub mod process_ops;

pub use fake_hal::{FakeHal, Operation};
pub use host_info_ops::HostInfoOps;
pub use linux_hal::LinuxHal;
pub use probe_ops::ProbeOps;
pub use process_ops::ProcessOps;

/// Complete HAL combining all system operation traits.
pub trait SystemHal: ProcessOps + ProbeOps + HostInfoOps + Send + Sync {}

/// Automatically implement SystemHal for any type implementing all required traits.
impl<T> SystemHal for T where T: ProcessOps + ProbeOps + HostInfoOps + Send + Sync {}
