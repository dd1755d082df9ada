//! Volume configuration file

use anyhow::{bail, Context, Result};
use retention::{parse_weekday, RetentionPolicy, SnapshotTarget};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Ready-to-paste configuration, shown when the config file is missing.
pub const EXAMPLE_CONFIG: &str = r#"[[volume]]
mounts    = ["/mnt/btrfs-store-root"]
source    = "/mnt/btrfs-store-root/store"
directory = "/mnt/btrfs-store-root"
prefix    = "store-snapshot"

[volume.keep]
days    = 14
weeks   = 10
anchor  = "monday"
months  = 12
years   = 5
"#;

/// Top-level configuration: one `[[volume]]` table per subvolume to rotate.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(rename = "volume", default)]
    pub volumes: Vec<VolumeConfig>,
}

/// One subvolume to snapshot and the rotation rules for it.
#[derive(Debug, Deserialize)]
pub struct VolumeConfig {
    /// Mount points to mount before and unmount after the run. Each needs
    /// an /etc/fstab entry. Leave empty when everything is always mounted.
    #[serde(default)]
    pub mounts: Vec<PathBuf>,

    /// Subvolume to snapshot.
    pub source: PathBuf,

    /// Directory the dated snapshots are stored in.
    pub directory: PathBuf,

    /// Snapshot name prefix; snapshots are named `<prefix>-YYYY-MM-DD`.
    pub prefix: String,

    pub keep: KeepConfig,
}

/// How many snapshots to keep in each time aggregation.
#[derive(Debug, Deserialize)]
pub struct KeepConfig {
    #[serde(default)]
    pub days: u32,

    #[serde(default)]
    pub weeks: u32,

    /// Weekday the weekly snapshots are anchored to, e.g. "monday" or "mon".
    #[serde(default = "default_anchor")]
    pub anchor: String,

    #[serde(default)]
    pub months: u32,

    #[serde(default)]
    pub years: u32,
}

fn default_anchor() -> String {
    "monday".to_string()
}

impl Config {
    /// Load and fully validate a configuration file. Every error is fatal
    /// before any volume is touched.
    pub fn load(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path).with_context(|| {
            format!(
                "unable to read config {}; create one like:\n\n{}",
                path.display(),
                EXAMPLE_CONFIG
            )
        })?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("unable to parse config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.volumes.is_empty() {
            bail!("no [[volume]] sections configured");
        }
        for volume in &self.volumes {
            volume
                .validate()
                .with_context(|| format!("volume {:?}", volume.prefix))?;
        }
        Ok(())
    }
}

impl VolumeConfig {
    fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            bail!("prefix must not be empty");
        }
        if self.prefix.contains('/') {
            bail!("prefix {:?} must not contain '/'", self.prefix);
        }
        if self.source.as_os_str().is_empty() {
            bail!("source must not be empty");
        }
        if self.directory.as_os_str().is_empty() {
            bail!("directory must not be empty");
        }
        self.policy()?;
        Ok(())
    }

    /// The retention policy this volume's `keep` table describes.
    pub fn policy(&self) -> Result<RetentionPolicy> {
        let policy = RetentionPolicy {
            days: self.keep.days,
            weeks: self.keep.weeks,
            anchor_weekday: parse_weekday(&self.keep.anchor)?,
            months: self.keep.months,
            years: self.keep.years,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn target(&self) -> SnapshotTarget {
        SnapshotTarget::new(&self.source, &self.directory, &self.prefix)
    }
}
