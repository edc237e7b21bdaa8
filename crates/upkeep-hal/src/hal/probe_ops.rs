//! Optional-tool probing.

/// Probing operations trait.
pub trait ProbeOps {
    /// Whether an executable with the given name is reachable on `PATH`.
    ///
    /// Absence of a tool is never an error; it gates optional maintenance
    /// steps, so this returns a plain bool.
    fn tool_available(&self, name: &str) -> bool;
}
