//! Retention policy configuration

use chrono::Weekday;
use thiserror::Error;

/// Ceiling on daily snapshots (ten years of days).
pub const MAX_DAYS: u32 = 3660;
/// Ceiling on weekly snapshots (ten years of weeks).
pub const MAX_WEEKS: u32 = 530;
/// Ceiling on monthly snapshots (a century of months).
pub const MAX_MONTHS: u32 = 1200;
/// Ceiling on yearly snapshots.
pub const MAX_YEARS: u32 = 100;

/// How many snapshots to keep in each time aggregation.
///
/// A count of zero keeps nothing in that aggregation; a policy with every
/// count at zero retains nothing but the snapshot taken today. The caps keep
/// the schedule's date arithmetic comfortably inside chrono's calendar range
/// for any plausible "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Daily snapshots, counting back from today.
    pub days: u32,
    /// Weekly snapshots, anchored to `anchor_weekday`.
    pub weeks: u32,
    /// Weekday whose snapshot represents the week.
    pub anchor_weekday: Weekday,
    /// Monthly snapshots, anchored to the first of the month.
    pub months: u32,
    /// Yearly snapshots, anchored to January 1.
    pub years: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            days: 14,
            weeks: 10,
            anchor_weekday: Weekday::Mon,
            months: 12,
            years: 5,
        }
    }
}

impl RetentionPolicy {
    /// Reject counts the schedule arithmetic is not sized for.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let checks = [
            ("days", self.days, MAX_DAYS),
            ("weeks", self.weeks, MAX_WEEKS),
            ("months", self.months, MAX_MONTHS),
            ("years", self.years, MAX_YEARS),
        ];
        for (field, value, max) in checks {
            if value > max {
                return Err(PolicyError::CountOutOfRange { field, value, max });
            }
        }
        Ok(())
    }

    /// True when no aggregation keeps anything.
    pub fn is_empty(&self) -> bool {
        self.days == 0 && self.weeks == 0 && self.months == 0 && self.years == 0
    }
}

/// Parse a weekday name as configured ("Monday", "monday", or "mon").
pub fn parse_weekday(name: &str) -> Result<Weekday, PolicyError> {
    name.parse::<Weekday>()
        .map_err(|_| PolicyError::UnknownWeekday(name.to_string()))
}

/// A policy that cannot be computed with.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("unknown weekday name {0:?} (expected e.g. \"monday\" or \"mon\")")]
    UnknownWeekday(String),

    #[error("keep.{field} = {value} exceeds the supported maximum of {max}")]
    CountOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}
