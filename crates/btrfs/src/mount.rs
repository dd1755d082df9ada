//! Mount point preparation for snapshot volumes

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

/// A mount or unmount step that failed.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("unable to mount {}: {detail}", path.display())]
    Mount { path: PathBuf, detail: String },
    #[error("unable to umount {}: {detail}", path.display())]
    Unmount { path: PathBuf, detail: String },
}

impl MountError {
    /// The mount point the failing step was working on.
    pub fn path(&self) -> &Path {
        match self {
            MountError::Mount { path, .. } | MountError::Unmount { path, .. } => path,
        }
    }
}

/// Mounts and unmounts the volumes a snapshot target lives on.
///
/// Paths are handed to `mount`/`umount` bare, so each needs an /etc/fstab
/// entry carrying its device and options. An empty list makes both calls
/// no-ops, for setups where everything is already mounted.
pub struct Mounter {
    mount_points: Vec<PathBuf>,
}

impl Mounter {
    pub fn new(mount_points: Vec<PathBuf>) -> Self {
        Self { mount_points }
    }

    pub fn is_empty(&self) -> bool {
        self.mount_points.is_empty()
    }

    /// Mount every configured mount point in order, echoing each success to
    /// `out`. When one fails, the points mounted so far are released again
    /// before the error is reported, so a half-prepared run leaves nothing
    /// behind.
    pub fn mount_all(&self, out: &mut dyn Write) -> Result<(), MountError> {
        for (index, path) in self.mount_points.iter().enumerate() {
            if let Err(detail) = run_tool("mount", path) {
                self.release(&self.mount_points[..index], out);
                return Err(MountError::Mount {
                    path: path.clone(),
                    detail,
                });
            }
            debug!("mounted {}", path.display());
            let _ = writeln!(out, "Mounted {}", path.display());
        }
        Ok(())
    }

    /// Best-effort unmount of `paths`, most recently mounted first.
    fn release(&self, paths: &[PathBuf], out: &mut dyn Write) {
        for path in paths.iter().rev() {
            match run_tool("umount", path) {
                Ok(()) => {
                    debug!("unmounted {}", path.display());
                    let _ = writeln!(out, "Un-mounted {}", path.display());
                }
                Err(detail) => warn!("{} is still mounted: {}", path.display(), detail),
            }
        }
    }

    /// Unmount every configured mount point in order, echoing each success
    /// to `out`. Stops at the first failure.
    pub fn unmount_all(&self, out: &mut dyn Write) -> Result<(), MountError> {
        for path in &self.mount_points {
            run_tool("umount", path).map_err(|detail| MountError::Unmount {
                path: path.clone(),
                detail,
            })?;
            debug!("unmounted {}", path.display());
            let _ = writeln!(out, "Un-mounted {}", path.display());
        }
        Ok(())
    }
}

fn run_tool(tool: &str, path: &Path) -> Result<(), String> {
    debug!("running {} {}", tool, path.display());
    let output = Command::new(tool)
        .arg(path)
        .output()
        .map_err(|e| e.to_string())?;
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
    warn!("{} {} failed: {}", tool, path.display(), detail);
    Err(detail)
}
