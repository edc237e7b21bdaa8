use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use upkeep_core::context::RunContext;
use upkeep_core::notify::Notifier;
use upkeep_core::run_report::{report_path, RunReportWriter, StepOutcome};
use upkeep_core::runner::Orchestrator;
use upkeep_core::steps::{default_plan, PlanConfig};
use upkeep_core::{logging, pkg, preflight, retention};
use upkeep_hal::{LinuxHal, SystemHal};

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init(Path::new(logging::DEFAULT_LOG_DIR));

    let hal: Arc<dyn SystemHal> = Arc::new(LinuxHal::new());

    // Preflight is the only thing allowed to exit non-zero. Once it
    // passes, step failures are report data and the process exits 0.
    let preflight_cfg = preflight::PreflightConfig {
        require_root: !cli.dry_run,
        prepare_dirs: !cli.dry_run,
        ..Default::default()
    };
    preflight::run(&preflight_cfg, &hal)?;

    if cli.dry_run {
        log::info!("DRY RUN: skipping retention pruning");
    } else {
        let window = retention::retention_window(cli.retention_days);
        for dir in [&preflight_cfg.log_dir, &preflight_cfg.backup_root] {
            match retention::prune(dir, window) {
                Ok(0) => {}
                Ok(n) => log::info!("pruned {n} stale entries from {}", dir.display()),
                Err(err) => log::warn!("retention pruning failed for {}: {err:#}", dir.display()),
            }
        }
    }

    let backend = pkg::detect(&hal, cli.dry_run)?;
    log::info!("package backend: {}", backend.name());

    // Dry runs execute nothing, notifications included.
    let notifier = if cli.no_notify || cli.dry_run {
        Notifier::disabled(Arc::clone(&hal))
    } else {
        Notifier::new(Arc::clone(&hal))
    };
    let writer = RunReportWriter::new(cli.report_path.unwrap_or_else(report_path));
    let ctx = RunContext::new(hal, backend, notifier, writer, cli.dry_run);

    let plan_cfg = PlanConfig::default();
    let mut orchestrator = Orchestrator::new();
    for step in default_plan(&plan_cfg) {
        orchestrator.register(step);
    }

    let report = orchestrator.run(&ctx);

    log::info!("run finished: {}", report.summary());
    for step in &report.steps {
        let marker = match step.outcome {
            StepOutcome::Success => "✅",
            StepOutcome::Failure => "❌",
            StepOutcome::Skipped => "⏭️ ",
        };
        log::info!("  {marker} {}", step.name);
    }
    if report.reboot_recommended {
        log::info!(
            "🔁 reboot recommended: running {} but {} is installed",
            report.kernel_before.as_deref().unwrap_or("unknown"),
            report.kernel_after.as_deref().unwrap_or("unknown"),
        );
    }

    Ok(())
}
