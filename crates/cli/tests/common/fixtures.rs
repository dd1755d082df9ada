//! Disposable rotation fixtures for end-to-end tests

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway snapshot directory plus a config file pointing at it.
pub struct RotationFixture {
    dir: TempDir,
}

impl RotationFixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("snapshots"))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.dir.path().join("snapshots")
    }

    /// Drop a snapshot directory entry named the way a rotation would
    /// have named it.
    pub fn add_snapshot(&self, name: &str) -> Result<()> {
        fs::create_dir(self.snapshot_dir().join(name))?;
        Ok(())
    }

    pub fn has_snapshot(&self, name: &str) -> bool {
        self.snapshot_dir().join(name).exists()
    }

    /// Write a config covering this fixture's directories with the given
    /// `[volume.keep]` body, returning the config path.
    pub fn write_config(&self, keep: &str) -> Result<PathBuf> {
        self.write_config_with_mounts(keep, &[])
    }

    /// Like [`Self::write_config`], but with mount points the run must
    /// prepare first.
    pub fn write_config_with_mounts(&self, keep: &str, mounts: &[&Path]) -> Result<PathBuf> {
        let mounts = mounts
            .iter()
            .map(|point| format!("\"{}\"", point.display()))
            .collect::<Vec<_>>()
            .join(", ");
        let body = format!(
            r#"[[volume]]
mounts    = [{mounts}]
source    = "{source}"
directory = "{directory}"
prefix    = "store-snapshot"

[volume.keep]
{keep}
"#,
            mounts = mounts,
            source = self.dir.path().join("source").display(),
            directory = self.snapshot_dir().display(),
            keep = keep
        );
        self.write_raw_config(&body)
    }

    /// Write arbitrary config contents, for malformed-config tests.
    pub fn write_raw_config(&self, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join("config.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }
}
