//! Snapshot naming and discovery types

use chrono::NaiveDate;
use std::path::PathBuf;

/// Where snapshots of one subvolume live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTarget {
    /// Subvolume being snapshotted.
    pub source: PathBuf,
    /// Directory the dated snapshots are stored in.
    pub directory: PathBuf,
    /// Name prefix shared by every snapshot of this target.
    pub prefix: String,
}

impl SnapshotTarget {
    pub fn new(
        source: impl Into<PathBuf>,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Name of the snapshot for `date`, e.g. `home-2024-06-10`.
    pub fn snapshot_name(&self, date: NaiveDate) -> String {
        format!("{}-{}", self.prefix, date)
    }

    /// Full path of the snapshot for `date`.
    pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(self.snapshot_name(date))
    }

    /// Recover the date from a directory entry name, if the entry belongs to
    /// this target. Anything else in the directory is ignored by returning
    /// `None`: foreign prefixes, malformed or unpadded dates, trailing text.
    pub fn parse_snapshot_name(&self, name: &str) -> Option<SnapshotRecord> {
        let rest = name.strip_prefix(&self.prefix)?;
        let rest = rest.strip_prefix('-')?;
        parse_exact_date(rest).map(|date| SnapshotRecord { date })
    }
}

/// Parse `YYYY-MM-DD` with nothing before or after it.
fn parse_exact_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    let digits = b
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 7)
        .all(|(_, c)| c.is_ascii_digit());
    if !digits {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// One existing snapshot of a target, identified by its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotRecord {
    pub date: NaiveDate,
}

impl SnapshotRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}
