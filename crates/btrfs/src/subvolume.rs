//! Btrfs subvolume snapshot and delete wrappers

use retention::{SnapshotError, SnapshotStore};
use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, warn};

/// Shells out to the `btrfs` tool for snapshot creation and deletion.
///
/// Snapshots are created read-only. Deletes may pass `--commit-after` so
/// the freed space is committed before the next command runs.
#[derive(Debug, Default)]
pub struct BtrfsStore;

impl BtrfsStore {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotStore for BtrfsStore {
    fn create_snapshot(&mut self, source: &Path, dest: &Path) -> Result<(), SnapshotError> {
        let command = self.render_create(source, dest);
        debug!("running {}", command);
        let output = Command::new("btrfs")
            .args(["subvolume", "snapshot", "-r"])
            .arg(source)
            .arg(dest)
            .output()
            .map_err(|err| SnapshotError::Spawn {
                command: command.clone(),
                source: err,
            })?;
        check_status(command, &output)
    }

    fn delete_snapshot(&mut self, dest: &Path, commit_after: bool) -> Result<(), SnapshotError> {
        let command = self.render_delete(dest, commit_after);
        debug!("running {}", command);
        let mut invocation = Command::new("btrfs");
        invocation.args(["subvolume", "delete"]);
        if commit_after {
            invocation.arg("--commit-after");
        }
        let output = invocation.arg(dest).output().map_err(|err| SnapshotError::Spawn {
            command: command.clone(),
            source: err,
        })?;
        check_status(command, &output)
    }

    fn render_create(&self, source: &Path, dest: &Path) -> String {
        format!(
            "btrfs subvolume snapshot -r {} {}",
            source.display(),
            dest.display()
        )
    }

    fn render_delete(&self, dest: &Path, commit_after: bool) -> String {
        if commit_after {
            format!("btrfs subvolume delete --commit-after {}", dest.display())
        } else {
            format!("btrfs subvolume delete {}", dest.display())
        }
    }
}

fn check_status(command: String, output: &Output) -> Result<(), SnapshotError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let detail = if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr.to_string()
    };
    warn!("`{}` failed: {}", command, detail);
    Err(SnapshotError::Failed { command, detail })
}
