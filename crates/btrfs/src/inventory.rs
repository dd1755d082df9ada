//! Snapshot directory inventory

use anyhow::Context;
use retention::{SnapshotRecord, SnapshotTarget};
use std::fs;
use tracing::debug;

/// List the snapshots of `target` already on disk.
///
/// One directory read. Entries that do not parse as `<prefix>-YYYY-MM-DD`
/// are skipped without comment, whatever they are. Records come back
/// date-sorted for stable logs; the planner does not care about order.
pub fn list_snapshots(target: &SnapshotTarget) -> crate::Result<Vec<SnapshotRecord>> {
    let entries = fs::read_dir(&target.directory).with_context(|| {
        format!(
            "unable to read snapshot directory {}",
            target.directory.display()
        )
    })?;

    let mut records = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| {
            format!(
                "unable to read snapshot directory {}",
                target.directory.display()
            )
        })?;
        let name = entry.file_name();
        if let Some(name) = name.to_str() {
            if let Some(record) = target.parse_snapshot_name(name) {
                records.push(record);
            }
        }
    }
    records.sort();
    debug!(
        "{} snapshots of {} under {}",
        records.len(),
        target.prefix,
        target.directory.display()
    );
    Ok(records)
}
