//! Plan execution and completion accounting

use crate::plan::{Action, ActionPlan};
use crate::target::SnapshotTarget;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// A snapshot operation that could not be carried out.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed: {detail}")]
    Failed { command: String, detail: String },
}

/// Backend that materializes snapshot operations. The `render_*` methods
/// return exactly the command line the matching operation runs, so a dry
/// run prints what a real run would do.
pub trait SnapshotStore {
    fn create_snapshot(&mut self, source: &Path, dest: &Path) -> Result<(), SnapshotError>;
    fn delete_snapshot(&mut self, dest: &Path, commit_after: bool) -> Result<(), SnapshotError>;
    fn render_create(&self, source: &Path, dest: &Path) -> String;
    fn render_delete(&self, dest: &Path, commit_after: bool) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Print the commands with action labels, touch nothing.
    DryRun,
    /// Print each command, then run it.
    Execute,
}

/// One operation that failed during a run.
#[derive(Debug)]
pub struct ActionFailure {
    pub date: NaiveDate,
    pub action: Action,
    pub error: SnapshotError,
}

/// Outcome of walking a plan.
#[derive(Debug)]
pub struct ExecutionReport {
    /// Plan entries that should exist afterwards (deletes drop out).
    pub total: usize,
    /// Snapshots present afterwards, today's counted up front.
    pub kept: usize,
    pub failures: Vec<ActionFailure>,
}

impl ExecutionReport {
    /// Share of desired snapshots that exist after the run, in percent.
    /// `Absent` entries count against this. Clamped to 100 for the corner
    /// where deletes leave fewer entries than kept snapshots.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        let raw = ((self.kept as f64 / self.total as f64) * 100.0).round() as u32;
        raw.min(100)
    }
}

/// Walk `plan` newest-first, printing each operation to `out` and, in
/// [`ExecutionMode::Execute`], running it through `store`.
///
/// Failed operations are recorded and the walk continues, so one bad
/// subvolume does not strand the rest of the rotation. A replace still
/// attempts its create when the preceding delete failed.
pub fn execute<S: SnapshotStore + ?Sized>(
    plan: &ActionPlan,
    target: &SnapshotTarget,
    mode: ExecutionMode,
    store: &mut S,
    out: &mut dyn Write,
) -> crate::Result<ExecutionReport> {
    let mut report = ExecutionReport {
        total: plan.len(),
        kept: 1,
        failures: Vec::new(),
    };

    writeln!(out)?;
    match mode {
        ExecutionMode::DryRun => writeln!(out, "The following commands will be executed:")?,
        ExecutionMode::Execute => writeln!(out, "Executing the following commands:")?,
    }

    for (date, action) in plan.iter_descending() {
        match action {
            Action::Create => {
                let dest = target.snapshot_path(date);
                let command = store.render_create(&target.source, &dest);
                match mode {
                    ExecutionMode::DryRun => writeln!(out, "CREATE: {}", command)?,
                    ExecutionMode::Execute => {
                        writeln!(out, "{}", command)?;
                        if let Err(error) = store.create_snapshot(&target.source, &dest) {
                            report.failures.push(ActionFailure { date, action, error });
                        }
                    }
                }
            }
            Action::Replace => {
                let dest = target.snapshot_path(date);
                let delete = store.render_delete(&dest, true);
                let create = store.render_create(&target.source, &dest);
                match mode {
                    ExecutionMode::DryRun => {
                        writeln!(out, "REPLC1: {}", delete)?;
                        writeln!(out, "REPLC2: {}", create)?;
                    }
                    ExecutionMode::Execute => {
                        writeln!(out, "{}", delete)?;
                        if let Err(error) = store.delete_snapshot(&dest, true) {
                            report.failures.push(ActionFailure { date, action, error });
                        }
                        writeln!(out, "{}", create)?;
                        if let Err(error) = store.create_snapshot(&target.source, &dest) {
                            report.failures.push(ActionFailure { date, action, error });
                        }
                    }
                }
            }
            Action::Delete => {
                let dest = target.snapshot_path(date);
                let command = store.render_delete(&dest, true);
                match mode {
                    ExecutionMode::DryRun => writeln!(out, "DELETE: {}", command)?,
                    ExecutionMode::Execute => {
                        writeln!(out, "{}", command)?;
                        if let Err(error) = store.delete_snapshot(&dest, true) {
                            report.failures.push(ActionFailure { date, action, error });
                        }
                    }
                }
                report.total -= 1;
            }
            Action::Keep => report.kept += 1,
            Action::Absent => {}
        }
    }

    Ok(report)
}
