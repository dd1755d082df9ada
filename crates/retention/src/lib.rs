//! GFS snapshot retention engine
//!
//! This crate decides what a rotation run must do:
//! - `RetentionPolicy`: how much daily/weekly/monthly/yearly history to keep
//! - `RetentionSchedule`: which dates must have a snapshot, and why
//! - `ActionPlan`: those dates reconciled against the snapshot directory
//! - `execute`: the plan carried out (or printed) with completion accounting
//!
//! Everything here is pure value manipulation except `execute`, which drives
//! the `SnapshotStore` collaborator and writes its command lines to a
//! caller-chosen stream.

pub mod executor;
pub mod plan;
pub mod policy;
pub mod schedule;
pub mod target;

// Re-exports
pub use executor::{
    execute, ActionFailure, ExecutionMode, ExecutionReport, SnapshotError, SnapshotStore,
};
pub use plan::{Action, ActionPlan};
pub use policy::{parse_weekday, PolicyError, RetentionPolicy};
pub use schedule::{Granularity, RetentionSchedule};
pub use target::{SnapshotRecord, SnapshotTarget};

/// Result type for rotation operations
pub type Result<T> = anyhow::Result<T>;
