//! Btrfs-facing collaborators for snapshot rotation
//!
//! This crate provides:
//! - Mount point preparation (`mount`/`umount` via /etc/fstab)
//! - The btrfs subvolume snapshot/delete command wrappers
//! - Snapshot directory inventory

pub mod inventory;
pub mod mount;
pub mod subvolume;

// Re-exports
pub use inventory::list_snapshots;
pub use mount::{MountError, Mounter};
pub use subvolume::BtrfsStore;

/// Result type for btrfs operations
pub type Result<T> = anyhow::Result<T>;
