//! Persistent run report artifact.
//!
//! Every maintenance run produces a first-class `RunReport` value that is
//! also mirrored to disk as JSON after each step, so an interrupted run
//! still leaves a usable record.
//! Default path: `/var/log/upkeep/run-report.json` (override via
//! `UPKEEP_REPORT_PATH` for tests).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_REPORT_PATH: &str = "/var/log/upkeep/run-report.json";

pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub fn report_path() -> PathBuf {
    std::env::var_os("UPKEEP_REPORT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Success,
    Failure,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub outcome: StepOutcome,
    pub started_at_unix_ms: Option<u64>,
    pub ended_at_unix_ms: Option<u64>,
    /// Captured output on success, error chain on failure, reason on skip.
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub report_version: u32,
    pub started_at_unix_ms: u64,
    pub ended_at_unix_ms: Option<u64>,
    pub hostname: Option<String>,
    pub kernel_before: Option<String>,
    pub kernel_after: Option<String>,
    pub reboot_recommended: bool,
    pub status: RunStatus,
    #[serde(default)]
    pub steps: Vec<StepResult>,
}

impl RunReport {
    pub fn begin(hostname: Option<String>) -> Self {
        Self {
            report_version: 1,
            started_at_unix_ms: now_unix_ms(),
            ended_at_unix_ms: None,
            hostname,
            kernel_before: None,
            kernel_after: None,
            reboot_recommended: false,
            status: RunStatus::Running,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, name: &str, outcome: StepOutcome, detail: Option<String>) {
        self.steps.push(StepResult {
            name: name.to_string(),
            outcome,
            started_at_unix_ms: None,
            ended_at_unix_ms: Some(now_unix_ms()),
            detail,
        });
    }

    pub fn record_timed(
        &mut self,
        name: &str,
        outcome: StepOutcome,
        started_at_unix_ms: u64,
        detail: Option<String>,
    ) {
        self.steps.push(StepResult {
            name: name.to_string(),
            outcome,
            started_at_unix_ms: Some(started_at_unix_ms),
            ended_at_unix_ms: Some(now_unix_ms()),
            detail,
        });
    }

    /// Close the report. The reboot recommendation is plain string
    /// inequality of the two kernel release strings; build-metadata-only
    /// differences still count as "different".
    pub fn finalize(&mut self, status: RunStatus) {
        self.reboot_recommended = match (&self.kernel_before, &self.kernel_after) {
            (Some(before), Some(after)) => before != after,
            _ => false,
        };
        self.status = status;
        self.ended_at_unix_ms = Some(now_unix_ms());
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|s| s.outcome == outcome).count()
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} ok, {} failed, {} skipped",
            self.count(StepOutcome::Success),
            self.count(StepOutcome::Failure),
            self.count(StepOutcome::Skipped),
        );
        if self.status == RunStatus::Aborted {
            line.push_str(" (aborted)");
        }
        if self.reboot_recommended {
            line.push_str(" — reboot recommended");
        }
        line
    }
}

/// Mirrors a `RunReport` to disk. Persistence is best-effort during the
/// run; only the initial directory setup is allowed to fail the process.
#[derive(Debug, Clone)]
pub struct RunReportWriter {
    path: PathBuf,
}

impl RunReportWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persist(&self, report: &RunReport) -> anyhow::Result<()> {
        write_json_atomic(&self.path, report).context("failed to persist run report")
    }
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory: {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let payload = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    fs::write(&tmp, payload).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to atomically replace report: {}", path.display()))?;
    if let Some(parent) = path.parent() {
        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn identical_kernels_do_not_recommend_reboot() {
        let mut report = RunReport::begin(None);
        report.kernel_before = Some("6.9.1-100".to_string());
        report.kernel_after = Some("6.9.1-100".to_string());
        report.finalize(RunStatus::Completed);
        assert!(!report.reboot_recommended);
    }

    #[test]
    fn differing_kernels_recommend_reboot() {
        let mut report = RunReport::begin(None);
        report.kernel_before = Some("6.9.1-100".to_string());
        report.kernel_after = Some("6.10.0-101".to_string());
        report.finalize(RunStatus::Completed);
        assert!(report.reboot_recommended);
    }

    #[test]
    fn build_metadata_difference_still_counts() {
        let mut report = RunReport::begin(None);
        report.kernel_before = Some("6.9.1-100.fc40.aarch64".to_string());
        report.kernel_after = Some("6.9.1-100.fc41.aarch64".to_string());
        report.finalize(RunStatus::Completed);
        assert!(report.reboot_recommended);
    }

    #[test]
    fn missing_kernel_means_no_recommendation() {
        let mut report = RunReport::begin(None);
        report.kernel_before = Some("6.9.1-100".to_string());
        report.finalize(RunStatus::Completed);
        assert!(!report.reboot_recommended);
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut report = RunReport::begin(None);
        report.record("a", StepOutcome::Success, None);
        report.record("b", StepOutcome::Failure, Some("boom".to_string()));
        report.record("c", StepOutcome::Skipped, None);
        report.finalize(RunStatus::Completed);
        assert_eq!(report.summary(), "1 ok, 1 failed, 1 skipped");
    }

    #[test]
    fn writer_persists_atomic_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run-report.json");
        let writer = RunReportWriter::new(path.clone());

        let mut report = RunReport::begin(Some("batcave".to_string()));
        report.record("upgrade packages", StepOutcome::Success, None);
        report.finalize(RunStatus::Completed);
        writer.persist(&report).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let parsed: RunReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.report_version, 1);
        assert_eq!(parsed.hostname.as_deref(), Some("batcave"));
        assert_eq!(parsed.steps.len(), 1);
        assert_eq!(parsed.status, RunStatus::Completed);
        assert!(!dir.path().join("run-report.json.tmp").exists());
    }
}
