//! Plan Executor
//!
//! Runs a [`Plan`] one step at a time and reports through a
//! [`ProgressSink`].
//!
//! # Contract
//!
//! - `on_plan(total)` comes first, then per step `on_start` followed by
//!   either `on_success` + `on_progress` or `on_failure`
//! - The first failure ends the run: later steps never start and nothing is
//!   rolled back
//! - A non-zero exit, a spawn error and a file I/O error are all the same
//!   kind of failure
//! - The process working directory is never changed; each step runs in the
//!   directory the plan assigns it
//!
//! ```text
//! step 1 ─ok─> step 2 ─ok─> step 3 ─fail─> Aborted { feature, reason }
//!                                           (step 4.. never start)
//! ```

use std::fmt;

use tracing::{error, info};

use crate::command_runner::CommandRunner;
use crate::engine::catalog::Action;
use crate::engine::plan::{Plan, PlanStep, WorkDir};
use crate::error::{HeadstartError, Result};
use crate::reporter::ProgressSink;

// ============================================================================
// Outcomes
// ============================================================================

/// Result of one attempted step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
}

/// Record of one attempted step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub feature: String,
    pub label: String,
    pub outcome: StepOutcome,
}

/// How the run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Aborted { feature: String, reason: String },
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Aborted { feature, reason } => write!(f, "aborted at {}: {}", feature, reason),
        }
    }
}

/// Everything that happened during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// One entry per attempted step; steps after a failure have none
    pub outcomes: Vec<StepRecord>,
    pub completed: usize,
    pub total: usize,
    pub status: RunStatus,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// The record of the failed step, if the run aborted
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.outcomes
            .iter()
            .find(|r| matches!(r.outcome, StepOutcome::Failed(_)))
    }

    /// Turn an aborted run into `ActionExecution`.
    pub fn into_result(self) -> Result<Self> {
        match &self.status {
            RunStatus::Completed => Ok(self),
            RunStatus::Aborted { feature, reason } => {
                Err(HeadstartError::action(feature.clone(), reason.clone()))
            }
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Sequential, fail-fast plan runner
pub struct Executor<R: CommandRunner> {
    runner: R,
    dry_run: bool,
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            dry_run: false,
        }
    }

    /// Report every step as successful without running anything
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `plan` to completion or to its first failure.
    pub fn execute(&mut self, plan: &Plan, sink: &mut dyn ProgressSink) -> ExecutionReport {
        let total = plan.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut completed = 0;

        info!(app = %plan.app_name, total, dry_run = self.dry_run, "Executing plan");
        sink.on_plan(total);

        for step in plan.steps() {
            let label = step.label();
            info!(feature = %step.feature, %label, "Step started");
            sink.on_start(&step.feature, &label);

            let result = if self.dry_run {
                Ok(())
            } else {
                self.run_step(plan, step)
            };

            match result {
                Ok(()) => {
                    completed += 1;
                    sink.on_success(&step.feature, &label);
                    sink.on_progress(completed, total);
                    outcomes.push(StepRecord {
                        feature: step.feature.clone(),
                        label,
                        outcome: StepOutcome::Succeeded,
                    });
                }
                Err(reason) => {
                    error!(feature = %step.feature, %label, %reason, "Step failed, aborting");
                    sink.on_failure(&step.feature, &label, &reason);
                    outcomes.push(StepRecord {
                        feature: step.feature.clone(),
                        label,
                        outcome: StepOutcome::Failed(reason.clone()),
                    });
                    return ExecutionReport {
                        outcomes,
                        completed,
                        total,
                        status: RunStatus::Aborted {
                            feature: step.feature.clone(),
                            reason,
                        },
                    };
                }
            }
        }

        info!(completed, "Plan finished");
        ExecutionReport {
            outcomes,
            completed,
            total,
            status: RunStatus::Completed,
        }
    }

    /// Run one step; `Err` carries the user-facing reason.
    fn run_step(&mut self, plan: &Plan, step: &PlanStep) -> std::result::Result<(), String> {
        let dir = plan.dir_for(step.workdir);

        match &step.action {
            Action::Command { line, .. } => {
                let output = self.runner.run(line, &dir).map_err(|e| e.to_string())?;
                if let Some(reason) = output.failure_reason() {
                    return Err(reason);
                }
            }
            Action::FileMutation(mutation) => {
                mutation
                    .apply(&dir)
                    .map_err(|e| format!("{}: {}", mutation.path().display(), e))?;
            }
        }

        // Later steps run inside the project; a scaffold that exits 0 without
        // creating it has still failed.
        if step.workdir == WorkDir::Base && !plan.project_dir().is_dir() {
            return Err(format!(
                "{} was not created",
                plan.project_dir().display()
            ));
        }

        Ok(())
    }
}
