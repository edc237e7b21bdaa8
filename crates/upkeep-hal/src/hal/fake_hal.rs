//! Fake HAL implementation for testing.
//!
//! Records all operations without executing them, allowing CI-safe testing
//! without root privileges or a real package manager.

use super::{HostInfoOps, ProbeOps, ProcessOps};
use crate::{HalError, HalResult};
use std::collections::{HashMap, HashSet};
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operation records for testing and verification.
#[derive(Debug, Clone)]
pub enum Operation {
    Command {
        program: String,
        args: Vec<String>,
        timeout_secs: u64,
    },
}

#[derive(Debug, Clone)]
struct CommandResponse {
    stdout: String,
    exit_code: i32,
}

#[derive(Debug, Default)]
struct FakeHalState {
    operations: Vec<Operation>,
    responses: HashMap<String, CommandResponse>,
    tools: HashSet<String>,
    hostname: Option<String>,
    kernel_release: Option<String>,
    effective_uid: u32,
}

/// Fake HAL that records commands instead of running them.
///
/// Commands succeed with empty output unless a response or failure has been
/// scripted for the program name. The effective uid defaults to 0 so
/// privileged workflows run unmodified in tests.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    /// Programs invoked, in invocation order.
    pub fn invoked_programs(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .operations
            .iter()
            .map(|Operation::Command { program, .. }| program.clone())
            .collect()
    }

    /// Script stdout for all invocations of `program`.
    pub fn respond_with(&self, program: &str, stdout: &str) {
        self.state.lock().unwrap().responses.insert(
            program.to_string(),
            CommandResponse {
                stdout: stdout.to_string(),
                exit_code: 0,
            },
        );
    }

    /// Make all invocations of `program` exit non-zero.
    pub fn fail_command(&self, program: &str) {
        self.state.lock().unwrap().responses.insert(
            program.to_string(),
            CommandResponse {
                stdout: String::new(),
                exit_code: 1,
            },
        );
    }

    /// Mark a tool as present on PATH.
    pub fn set_tool_available(&self, name: &str) {
        self.state.lock().unwrap().tools.insert(name.to_string());
    }

    pub fn set_hostname(&self, hostname: &str) {
        self.state.lock().unwrap().hostname = Some(hostname.to_string());
    }

    pub fn set_kernel_release(&self, release: &str) {
        self.state.lock().unwrap().kernel_release = Some(release.to_string());
    }

    pub fn set_effective_uid(&self, uid: u32) {
        self.state.lock().unwrap().effective_uid = uid;
    }
}

fn exit_status(code: i32) -> ExitStatus {
    // Wait-status encoding: exit code lives in the high byte.
    ExitStatus::from_raw(code << 8)
}

impl ProcessOps for FakeHal {
    fn command_output(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Output> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(Operation::Command {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout_secs: timeout.as_secs(),
        });
        let response = state.responses.get(program).cloned();
        drop(state);

        let (stdout, code) = match response {
            Some(r) => (r.stdout, r.exit_code),
            None => (String::new(), 0),
        };
        Ok(Output {
            status: exit_status(code),
            stdout: stdout.into_bytes(),
            stderr: Vec::new(),
        })
    }

    fn command_status(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<()> {
        let output = self.command_output(program, args, timeout)?;
        if !output.status.success() {
            return Err(HalError::CommandFailed {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

impl ProbeOps for FakeHal {
    fn tool_available(&self, name: &str) -> bool {
        self.state.lock().unwrap().tools.contains(name)
    }
}

impl HostInfoOps for FakeHal {
    fn hostname(&self) -> HalResult<Option<String>> {
        Ok(self.state.lock().unwrap().hostname.clone())
    }

    fn kernel_release(&self) -> HalResult<Option<String>> {
        Ok(self.state.lock().unwrap().kernel_release.clone())
    }

    fn effective_uid(&self) -> u32 {
        self.state.lock().unwrap().effective_uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let hal = FakeHal::new();
        hal.command_status("dnf", &["upgrade", "-y"], Duration::from_secs(60))
            .unwrap();
        hal.command_output("ps", &["-eo", "pid,stat,comm"], Duration::from_secs(5))
            .unwrap();

        assert_eq!(hal.invoked_programs(), vec!["dnf", "ps"]);
        assert!(hal.has_operation(|Operation::Command { program, args, .. }| {
            program == "dnf" && args == &["upgrade", "-y"]
        }));
    }

    #[test]
    fn scripted_failure_turns_into_command_failed() {
        let hal = FakeHal::new();
        hal.fail_command("rkhunter");
        let err = hal
            .command_status("rkhunter", &["--check"], Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, HalError::CommandFailed { .. }));
    }

    #[test]
    fn scripted_stdout_is_returned() {
        let hal = FakeHal::new();
        hal.respond_with("ps", "  1 S init\n");
        let output = hal
            .command_output("ps", &[], Duration::from_secs(5))
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "  1 S init\n");
    }

    #[test]
    fn tools_default_to_absent() {
        let hal = FakeHal::new();
        assert!(!hal.tool_available("lynis"));
        hal.set_tool_available("lynis");
        assert!(hal.tool_available("lynis"));
    }
}
