//! Per-volume rotation flow

use crate::config::VolumeConfig;
use crate::prompt;
use crate::report::{self, Palette};
use anyhow::Result;
use btrfs::{BtrfsStore, Mounter};
use chrono::NaiveDate;
use nix::unistd::{access, AccessFlags};
use retention::{execute, ActionPlan, ExecutionMode, RetentionSchedule};
use std::io::Write;
use tracing::debug;

/// Flags that shape a run, straight from the command line.
pub struct RunOptions {
    pub dry_run: bool,
    pub yes: bool,
}

/// How one volume's rotation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeOutcome {
    Completed,
    Failed,
}

/// Rotate one volume end to end: mount, plan, preview, confirm, execute,
/// unmount. Fatal conditions are reported on `out` and become
/// [`VolumeOutcome::Failed`] instead of aborting the process, so the
/// remaining volumes still get their run.
pub fn run_volume(
    volume: &VolumeConfig,
    today: NaiveDate,
    options: &RunOptions,
    palette: &Palette,
    out: &mut dyn Write,
) -> Result<VolumeOutcome> {
    let policy = volume.policy()?;
    let target = volume.target();
    let mounter = Mounter::new(volume.mounts.clone());
    let mut failed = false;

    // 1. Mount the backing volumes
    if let Err(err) = mounter.mount_all(out) {
        debug!("{}", err);
        writeln!(
            out,
            "ERROR: Unable to mount {}. Check /etc/fstab and user permissions. -- Skipping this volume.",
            err.path().display()
        )?;
        return Ok(VolumeOutcome::Failed);
    }

    // 2. The snapshot destination must exist and be writable
    if !target.directory.exists() {
        writeln!(
            out,
            "ERROR: The snapshot destination does not exist: {} -- Skipping this volume.",
            target.directory.display()
        )?;
        unmount(&mounter, out)?;
        return Ok(VolumeOutcome::Failed);
    }
    if access(target.directory.as_path(), AccessFlags::W_OK).is_err() {
        writeln!(
            out,
            "ERROR: The snapshot destination is not writable by the user executing this process -- Skipping this volume."
        )?;
        unmount(&mounter, out)?;
        return Ok(VolumeOutcome::Failed);
    }

    // 3. Header, schedule, inventory, plan
    report::print_header(&target, &policy, palette, out)?;
    let schedule = RetentionSchedule::compute(today, &policy);
    let inventory = match btrfs::list_snapshots(&target) {
        Ok(inventory) => inventory,
        Err(err) => {
            writeln!(out, "ERROR: {:#} -- Skipping this volume.", err)?;
            unmount(&mounter, out)?;
            return Ok(VolumeOutcome::Failed);
        }
    };
    let plan = ActionPlan::build(today, &schedule, &inventory);

    // 4. Show the plan and the commands it implies
    report::print_plan_table(&plan, &schedule, palette, out)?;
    let mut store = BtrfsStore::new();
    execute(&plan, &target, ExecutionMode::DryRun, &mut store, out)?;

    // 5. Confirm and execute, unless told otherwise
    let proceed = if options.dry_run {
        false
    } else if options.yes {
        true
    } else {
        prompt::confirm(out)?
    };

    if proceed {
        let report = execute(&plan, &target, ExecutionMode::Execute, &mut store, out)?;
        writeln!(out, "{}% of desired snapshots exist.", report.percent())?;
        if !report.failures.is_empty() {
            failed = true;
            for failure in &report.failures {
                writeln!(out, "ERROR: {}", failure.error)?;
            }
        }
    } else if !options.dry_run {
        writeln!(out, "No actions taken. Exiting.")?;
    }

    // 6. Unmount and wrap up
    if !unmount(&mounter, out)? {
        failed = true;
    }
    writeln!(out, "Complete!")?;
    writeln!(out)?;

    Ok(if failed {
        VolumeOutcome::Failed
    } else {
        VolumeOutcome::Completed
    })
}

fn unmount(mounter: &Mounter, out: &mut dyn Write) -> Result<bool> {
    if let Err(err) = mounter.unmount_all(out) {
        debug!("{}", err);
        writeln!(out, "ERROR: Unable to umount {}", err.path().display())?;
        return Ok(false);
    }
    Ok(true)
}
