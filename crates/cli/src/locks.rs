//! Run lock tied to one configuration file
//!
//! Two rotations sharing a config would race the same mounts and snapshot
//! directories, so each run takes an exclusive flock on `<config>.lock`
//! before doing anything else. The kernel releases the flock with its
//! holder, so a crashed run never needs manual cleanup. The file itself is
//! never unlinked; its JSON content only names the current holder.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Held for the duration of one rotation. Dropping it releases the flock;
/// the lock file stays behind for the next run to relock in place.
#[derive(Debug)]
pub struct RunLock {
    #[allow(dead_code)]
    file: File,
}

/// What the lock file says about its holder.
#[derive(Serialize, Deserialize)]
struct LockOwner {
    pid: u32,
    acquired_at_ms: i64,
}

impl RunLock {
    /// Take the run lock for `config_path`, or fail if another process
    /// already holds it.
    pub fn acquire(config_path: &Path) -> Result<Self> {
        let path = lock_path_for(config_path);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("unable to open lock file {}", path.display()))?;

        if !flock_exclusive_nonblocking(&file)? {
            match read_owner(&mut file) {
                Some(owner) => bail!(
                    "another rotation is already running for this configuration (pid {}, lock file {})",
                    owner.pid,
                    path.display()
                ),
                None => bail!(
                    "another rotation is already running for this configuration (lock file {})",
                    path.display()
                ),
            }
        }

        let owner = LockOwner {
            pid: std::process::id(),
            acquired_at_ms: chrono::Utc::now().timestamp_millis(),
        };
        let serialized = serde_json::to_string(&owner).context("unable to serialize lock owner")?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;

        Ok(Self { file })
    }
}

/// `<config>.lock`, next to the config so unrelated configs never contend.
fn lock_path_for(config_path: &Path) -> PathBuf {
    let mut name = config_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapwheel"));
    name.push(".lock");
    config_path.with_file_name(name)
}

/// The holder record in the lock file, if it carries a readable one. A
/// holder that has not written its record yet reads as `None`.
fn read_owner(file: &mut File) -> Option<LockOwner> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

#[cfg(unix)]
fn flock_exclusive_nonblocking(file: &File) -> Result<bool> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
