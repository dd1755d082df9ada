//! Action planning against an existing snapshot inventory

use crate::schedule::RetentionSchedule;
use crate::target::SnapshotRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// What a run does about one dated snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Snapshot today's date, which has no snapshot yet.
    Create,
    /// Delete and re-create today's snapshot.
    Replace,
    /// Scheduled date whose snapshot already exists.
    Keep,
    /// Existing snapshot no schedule rule covers any more.
    Delete,
    /// Scheduled date with no snapshot and no way to make one.
    Absent,
}

impl Action {
    /// Verb shown in the plan table.
    pub fn verb(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Replace => "replace",
            Action::Keep => "keep",
            Action::Delete => "delete",
            Action::Absent => "{}",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// One action per date, covering every scheduled date plus every existing
/// snapshot. Built fresh per run from the schedule and the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    actions: BTreeMap<NaiveDate, Action>,
}

impl ActionPlan {
    /// Classify every date in sight.
    ///
    /// Scheduled dates start out `Absent`, today is then marked `Create`
    /// unconditionally, and finally each inventory record overrides its
    /// date: unscheduled records become `Delete`, today's record becomes
    /// `Replace`, everything else `Keep`. Schedule membership is decided
    /// before the same-day check, so a snapshot dated today still gets
    /// deleted when today itself is not scheduled.
    pub fn build(
        today: NaiveDate,
        schedule: &RetentionSchedule,
        inventory: &[SnapshotRecord],
    ) -> Self {
        let mut actions = BTreeMap::new();

        for (date, _) in schedule.iter() {
            actions.insert(date, Action::Absent);
        }
        actions.insert(today, Action::Create);

        for record in inventory {
            let action = if !schedule.contains(record.date) {
                Action::Delete
            } else if record.date == today {
                Action::Replace
            } else {
                Action::Keep
            };
            actions.insert(record.date, action);
        }

        Self { actions }
    }

    pub fn action(&self, date: NaiveDate) -> Option<Action> {
        self.actions.get(&date).copied()
    }

    /// Entries newest first, the order actions are carried out in.
    pub fn iter_descending(&self) -> impl Iterator<Item = (NaiveDate, Action)> + '_ {
        self.actions.iter().rev().map(|(date, action)| (*date, *action))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
