//! Desired-retention schedule computation

use crate::policy::RetentionPolicy;
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::BTreeMap;

/// The finest aggregation whose rule covers a scheduled date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

/// The set of dates that must have a snapshot once a run completes, each
/// tagged with the aggregation that justifies keeping it.
///
/// Buckets are evaluated day, week, month, year; insertion is
/// insert-if-absent, so a date covered by several rules keeps the finest
/// tag. Computed fresh per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionSchedule {
    entries: BTreeMap<NaiveDate, Granularity>,
}

impl RetentionSchedule {
    /// Compute the schedule for `today` under `policy`.
    ///
    /// Total for validated policies: every date step uses checked arithmetic
    /// and silently skips the (unreachable under the policy caps) steps that
    /// would leave the calendar range.
    pub fn compute(today: NaiveDate, policy: &RetentionPolicy) -> Self {
        let mut entries = BTreeMap::new();

        // Daily: today and the days leading up to it.
        for i in 0..policy.days {
            if let Some(date) = today.checked_sub_days(Days::new(u64::from(i))) {
                entries.entry(date).or_insert(Granularity::Day);
            }
        }

        // Weekly: the most recent anchor weekday on or before today, then
        // whole weeks back from it. weeks == 0 keeps nothing weekly, the
        // anchor included.
        if policy.weeks > 0 {
            let back = (today.weekday().num_days_from_monday() + 7
                - policy.anchor_weekday.num_days_from_monday())
                % 7;
            if let Some(anchor) = today.checked_sub_days(Days::new(u64::from(back))) {
                for w in 0..policy.weeks {
                    if let Some(date) = anchor.checked_sub_days(Days::new(u64::from(w) * 7)) {
                        entries.entry(date).or_insert(Granularity::Week);
                    }
                }
            }
        }

        // Monthly: the first of this month, stepping whole months back.
        if let Some(month_start) = today.with_day(1) {
            for m in 0..policy.months {
                if let Some(date) = month_start.checked_sub_months(Months::new(m)) {
                    entries.entry(date).or_insert(Granularity::Month);
                }
            }
        }

        // Yearly: January 1 of this year, stepping twelve months at a time.
        if let Some(year_start) = NaiveDate::from_ymd_opt(today.year(), 1, 1) {
            for y in 0..policy.years {
                if let Some(date) = year_start.checked_sub_months(Months::new(y * 12)) {
                    entries.entry(date).or_insert(Granularity::Year);
                }
            }
        }

        Self { entries }
    }

    /// Why `date` is retained, if it is scheduled at all.
    pub fn granularity(&self, date: NaiveDate) -> Option<Granularity> {
        self.entries.get(&date).copied()
    }

    /// True when `date` must have a snapshot after the run.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    /// Scheduled dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Granularity)> + '_ {
        self.entries.iter().map(|(date, granularity)| (*date, *granularity))
    }

    /// Number of scheduled dates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the policy keeps nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
