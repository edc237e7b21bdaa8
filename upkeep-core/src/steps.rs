//! The default maintenance plan.
//!
//! Fixed, author-ordered step list: updates first, then cleanup, then the
//! audit/report steps. Later steps assume earlier ones were attempted but
//! never require their success, so everything here is optional
//! (continue-on-error).

use crate::backup::{self, BackupConfig};
use crate::context::RunContext;
use crate::reports;
use crate::runner::Step;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

const QUICK_TIMEOUT: Duration = Duration::from_secs(60);
const REPORT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
const UPDATE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const SCAN_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub backup: BackupConfig,
    pub vacuum_days: u32,
    pub top_files: usize,
    pub fs_root: PathBuf,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            backup: BackupConfig::default(),
            vacuum_days: 14,
            top_files: 10,
            fs_root: PathBuf::from("/"),
        }
    }
}

fn run_tool(
    ctx: &RunContext,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Option<String>> {
    if ctx.dry_run {
        log::info!("DRY RUN: {} {}", program, args.join(" "));
        return Ok(None);
    }
    ctx.hal.command_status(program, args, timeout)?;
    Ok(None)
}

fn tool_report(
    ctx: &RunContext,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Option<String>> {
    if ctx.dry_run {
        log::info!("DRY RUN: {} {}", program, args.join(" "));
        return Ok(None);
    }
    let output = ctx.hal.command_output(program, args, timeout)?;
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Build the default plan. Step order is the contract; callers feed the
/// result to [`crate::runner::Orchestrator::register`] unchanged.
pub fn default_plan(cfg: &PlanConfig) -> Vec<Step<'_>> {
    vec![
        Step::new("upgrade packages", |ctx| ctx.backend.upgrade_all()),
        Step::new("remove orphaned packages", |ctx| {
            ctx.backend.remove_orphans()
        }),
        Step::new("clean package cache", |ctx| ctx.backend.clean_cache()),
        Step::new("update flatpak apps", |ctx| {
            run_tool(
                ctx,
                "flatpak",
                &["update", "-y", "--noninteractive"],
                UPDATE_TIMEOUT,
            )
        })
        .gated_on_tool("flatpak"),
        Step::new("refresh snaps", |ctx| {
            run_tool(ctx, "snap", &["refresh"], UPDATE_TIMEOUT)
        })
        .gated_on_tool("snap"),
        Step::new("firmware update check", |ctx| {
            // Report-only: list pending firmware, apply nothing.
            tool_report(ctx, "fwupdmgr", &["get-updates"], REPORT_TIMEOUT)
        })
        .gated_on_tool("fwupdmgr"),
        Step::new("outdated pip packages", |ctx| {
            tool_report(ctx, "pip", &["list", "--outdated"], REPORT_TIMEOUT)
        })
        .gated_on_tool("pip"),
        Step::new("outdated npm globals", |ctx| {
            // `npm outdated` exits non-zero when anything is outdated;
            // the listing itself is the point, so status is ignored.
            tool_report(ctx, "npm", &["outdated", "-g"], REPORT_TIMEOUT)
        })
        .gated_on_tool("npm"),
        {
            let vacuum = format!("--vacuum-time={}d", cfg.vacuum_days);
            Step::new("vacuum journal logs", move |ctx| {
                run_tool(ctx, "journalctl", &[vacuum.as_str()], QUICK_TIMEOUT)
            })
            .gated_on_tool("journalctl")
        },
        {
            let backup_cfg = cfg.backup.clone();
            Step::new("back up config files", move |ctx| {
                if ctx.dry_run {
                    log::info!("DRY RUN: back up {} config files", backup_cfg.sources.len());
                    return Ok(None);
                }
                backup::run(&backup_cfg)
            })
        },
        Step::new("firewall state", |ctx| {
            if ctx.hal.tool_available("firewall-cmd") {
                tool_report(ctx, "firewall-cmd", &["--state"], QUICK_TIMEOUT)
            } else {
                tool_report(ctx, "ufw", &["status"], QUICK_TIMEOUT)
            }
        })
        .gated(|ctx| {
            ctx.hal.tool_available("firewall-cmd") || ctx.hal.tool_available("ufw")
        }),
        Step::new("rootkit scan", |ctx| {
            run_tool(ctx, "rkhunter", &["--check", "--sk", "--rwo"], SCAN_TIMEOUT)
        })
        .gated_on_tool("rkhunter"),
        Step::new("system audit", |ctx| {
            run_tool(
                ctx,
                "lynis",
                &["audit", "system", "--quick", "--quiet"],
                SCAN_TIMEOUT,
            )
        })
        .gated_on_tool("lynis"),
        Step::new("zombie process report", |ctx| {
            if ctx.dry_run {
                log::info!("DRY RUN: ps -eo pid,stat,comm --no-headers");
                return Ok(None);
            }
            let output = ctx.hal.command_output(
                "ps",
                &["-eo", "pid,stat,comm", "--no-headers"],
                QUICK_TIMEOUT,
            )?;
            Ok(Some(reports::zombie_summary(&String::from_utf8_lossy(
                &output.stdout,
            ))))
        }),
        {
            let root = cfg.fs_root.clone();
            let limit = cfg.top_files;
            Step::new("largest files report", move |ctx| {
                if ctx.dry_run {
                    log::info!("DRY RUN: scan {} for the {limit} largest files", root.display());
                    return Ok(None);
                }
                Ok(Some(reports::largest_files_summary(&root, limit)))
            })
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_has_a_fixed_order() {
        let cfg = PlanConfig::default();
        let plan = default_plan(&cfg);
        let names: Vec<_> = plan.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "upgrade packages",
                "remove orphaned packages",
                "clean package cache",
                "update flatpak apps",
                "refresh snaps",
                "firmware update check",
                "outdated pip packages",
                "outdated npm globals",
                "vacuum journal logs",
                "back up config files",
                "firewall state",
                "rootkit scan",
                "system audit",
                "zombie process report",
                "largest files report",
            ]
        );
    }

    #[test]
    fn no_step_in_the_default_plan_is_required() {
        let cfg = PlanConfig::default();
        assert!(default_plan(&cfg).iter().all(|s| !s.required));
    }
}
