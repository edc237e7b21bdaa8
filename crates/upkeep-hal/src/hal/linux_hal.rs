//! Linux HAL implementation using real system calls.

use super::{HostInfoOps, ProbeOps, ProcessOps};
use crate::{HalError, HalResult};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Real HAL implementation for Linux systems.
#[derive(Debug, Clone, Default)]
pub struct LinuxHal;

impl LinuxHal {
    pub fn new() -> Self {
        Self
    }
}

fn map_command_err(program: &str, err: std::io::Error) -> HalError {
    if err.kind() == std::io::ErrorKind::NotFound {
        return HalError::CommandNotFound(program.to_string());
    }
    HalError::Io(err)
}

fn output_failed(program: &str, output: &Output) -> HalError {
    HalError::CommandFailed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

fn output_with_timeout(program: &str, cmd: &mut Command, timeout: Duration) -> HalResult<Output> {
    // Avoid commands hanging waiting for input.
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(|e| map_command_err(program, e))?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    // Drain pipes concurrently to avoid deadlocks on large output.
    let stdout_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout.take() {
            let _ = out.read_to_end(&mut buf);
        }
        buf
    });
    let stderr_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr.take() {
            let _ = err.read_to_end(&mut buf);
        }
        buf
    });

    let status = match child.wait_timeout(timeout).map_err(HalError::Io)? {
        Some(status) => status,
        None => {
            log::warn!("{program} exceeded {}s timeout, killing", timeout.as_secs());
            let _ = child.kill();
            let _ = child.wait();
            let _ = stdout_handle.join();
            let _ = stderr_handle.join();
            return Err(HalError::CommandTimeout {
                program: program.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

impl ProcessOps for LinuxHal {
    fn command_output(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Output> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        output_with_timeout(program, &mut cmd, timeout)
    }

    fn command_status(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<()> {
        let output = self.command_output(program, args, timeout)?;
        if !output.status.success() {
            return Err(output_failed(program, &output));
        }
        Ok(())
    }
}

pub(crate) fn find_executable_in_path(binary: &str, path_env: &str) -> Option<PathBuf> {
    use std::os::unix::fs::PermissionsExt;
    for dir in path_env.split(':').filter(|dir| !dir.is_empty()) {
        let candidate = Path::new(dir).join(binary);
        if let Ok(metadata) = fs::metadata(&candidate) {
            if metadata.is_file() && metadata.permissions().mode() & 0o111 != 0 {
                return Some(candidate);
            }
        }
    }
    None
}

impl ProbeOps for LinuxHal {
    fn tool_available(&self, name: &str) -> bool {
        let path_env = std::env::var("PATH").unwrap_or_default();
        find_executable_in_path(name, &path_env).is_some()
    }
}

impl HostInfoOps for LinuxHal {
    fn hostname(&self) -> HalResult<Option<String>> {
        Ok(fs::read_to_string("/etc/hostname")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    fn kernel_release(&self) -> HalResult<Option<String>> {
        // `/proc/sys/kernel/osrelease` is the same string `uname -r` prints.
        Ok(fs::read_to_string("/proc/sys/kernel/osrelease")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    fn effective_uid(&self) -> u32 {
        nix::unistd::geteuid().as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn finds_executable_on_path() {
        let dir = tempdir().unwrap();
        let bin = dir.path().join("sometool");
        fs::write(&bin, "#!/bin/true").unwrap();
        let mut perms = fs::metadata(&bin).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&bin, perms).unwrap();

        let path_env = dir.path().to_string_lossy().to_string();
        assert_eq!(find_executable_in_path("sometool", &path_env), Some(bin));
        assert!(find_executable_in_path("missing", &path_env).is_none());
    }

    #[test]
    fn non_executable_file_is_not_found() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("data");
        fs::write(&file, "not a binary").unwrap();
        let mut perms = fs::metadata(&file).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&file, perms).unwrap();

        let path_env = dir.path().to_string_lossy().to_string();
        assert!(find_executable_in_path("data", &path_env).is_none());
    }

    #[test]
    fn command_output_captures_stdout() {
        let hal = LinuxHal::new();
        let output = hal
            .command_output("echo", &["hello"], Duration::from_secs(5))
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[test]
    fn command_status_reports_failure() {
        let hal = LinuxHal::new();
        let err = hal
            .command_status("false", &[], Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, HalError::CommandFailed { .. }));
    }

    #[test]
    fn hung_command_is_killed_at_the_timeout() {
        let hal = LinuxHal::new();
        let err = hal
            .command_output("sleep", &["5"], Duration::from_millis(50))
            .unwrap_err();
        match err {
            HalError::CommandTimeout { program, .. } => assert_eq!(program, "sleep"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_maps_to_command_not_found() {
        let hal = LinuxHal::new();
        let err = hal
            .command_status("definitely-not-a-real-binary", &[], Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, HalError::CommandNotFound(_)));
    }
}
