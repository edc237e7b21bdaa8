//! The maintenance-run orchestrator.
//!
//! Steps execute strictly in registration order, one at a time. A failing
//! step is recorded and the run continues — the value of a maintenance run
//! is in attempting every task, not in strict correctness of any one —
//! unless the step was registered as required, in which case the remaining
//! steps are dropped and the run is marked aborted. `run()` itself never
//! returns an error; every step failure is data in the report.

use crate::context::RunContext;
use crate::kernel;
use crate::run_report::{now_unix_ms, RunReport, RunStatus, StepOutcome};
use anyhow::Result;

pub type StepAction<'a> = Box<dyn Fn(&RunContext) -> Result<Option<String>> + 'a>;
pub type StepGate<'a> = Box<dyn Fn(&RunContext) -> bool + 'a>;

pub struct Step<'a> {
    pub name: &'static str,
    pub required: bool,
    applicability: Option<StepGate<'a>>,
    skip_detail: Option<String>,
    action: StepAction<'a>,
}

impl<'a> Step<'a> {
    pub fn new(
        name: &'static str,
        action: impl Fn(&RunContext) -> Result<Option<String>> + 'a,
    ) -> Self {
        Self {
            name,
            required: false,
            applicability: None,
            skip_detail: None,
            action: Box::new(action),
        }
    }

    /// Skip the step (recorded, not silent) when the predicate is false.
    pub fn gated(mut self, pred: impl Fn(&RunContext) -> bool + 'a) -> Self {
        self.applicability = Some(Box::new(pred));
        self
    }

    /// Gate on an optional tool being installed.
    pub fn gated_on_tool(mut self, tool: &'static str) -> Self {
        self.applicability = Some(Box::new(move |ctx| ctx.hal.tool_available(tool)));
        self.skip_detail = Some(format!("{tool} not installed; install it to enable this step"));
        self
    }

    /// Abort the remaining run if this step fails.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Default)]
pub struct Orchestrator<'a> {
    steps: Vec<Step<'a>>,
}

impl<'a> Orchestrator<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step to the run plan. Duplicate names are fine; steps are
    /// identified by position, names exist for logs and the report.
    pub fn register(&mut self, step: Step<'a>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&self, ctx: &RunContext) -> RunReport {
        let hostname = ctx.hal.hostname().ok().flatten();
        let mut report = RunReport::begin(hostname);
        report.kernel_before = kernel::running_release(&ctx.hal);
        persist(ctx, &report);

        let mut status = RunStatus::Completed;
        for step in &self.steps {
            if let Some(pred) = &step.applicability {
                if !pred(ctx) {
                    let detail = step
                        .skip_detail
                        .clone()
                        .unwrap_or_else(|| "not applicable on this system".to_string());
                    log::info!("⏭️  {}: skipped ({})", step.name, detail);
                    report.record(step.name, StepOutcome::Skipped, Some(detail));
                    persist(ctx, &report);
                    continue;
                }
            }

            ctx.notifier.notify(&format!("Starting: {}", step.name));
            log::info!("▶️  {}", step.name);
            let started_at = now_unix_ms();
            match (step.action)(ctx) {
                Ok(detail) => {
                    log::info!("✅ {}", step.name);
                    report.record_timed(step.name, StepOutcome::Success, started_at, detail);
                }
                Err(err) => {
                    let chain = format!("{err:#}");
                    log::warn!("❌ {}: {}", step.name, chain);
                    report.record_timed(step.name, StepOutcome::Failure, started_at, Some(chain));
                    if step.required {
                        log::error!("required step failed, aborting remaining steps");
                        status = RunStatus::Aborted;
                        persist(ctx, &report);
                        break;
                    }
                }
            }
            persist(ctx, &report);
        }

        report.kernel_after = kernel::newest_installed_release(&ctx.hal, &ctx.modules_dirs);
        report.finalize(status);
        persist(ctx, &report);

        ctx.notifier
            .notify(&format!("Maintenance finished: {}", report.summary()));
        report
    }
}

fn persist(ctx: &RunContext, report: &RunReport) {
    if let Err(err) = ctx.report_writer.persist(report) {
        log::debug!("report persist failed: {err:#}");
    }
}
