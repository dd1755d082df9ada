//! Colored run report rendering

use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::{OwoColorize, Style};
use retention::{Action, ActionPlan, Granularity, RetentionPolicy, RetentionSchedule, SnapshotTarget};
use std::io::Write;

const TABLE_COLUMNS: usize = 4;
const ACTION_CELL_WIDTH: usize = 8;

/// Output styles, resolved once at startup. The plain palette holds empty
/// styles, which format as bare text, so rendering code never branches on
/// whether color is enabled.
#[derive(Clone, Copy)]
pub struct Palette {
    day: Style,
    week: Style,
    month: Style,
    year: Style,
    untagged: Style,
}

impl Palette {
    pub fn new(colored: bool) -> Self {
        if colored {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    fn colored() -> Self {
        Self {
            day: Style::new().red(),
            week: Style::new().yellow(),
            month: Style::new().green(),
            year: Style::new().blue(),
            untagged: Style::new().bright_black(),
        }
    }

    fn plain() -> Self {
        Self {
            day: Style::new(),
            week: Style::new(),
            month: Style::new(),
            year: Style::new(),
            untagged: Style::new(),
        }
    }

    fn for_granularity(&self, granularity: Option<Granularity>) -> Style {
        match granularity {
            Some(Granularity::Day) => self.day,
            Some(Granularity::Week) => self.week,
            Some(Granularity::Month) => self.month,
            Some(Granularity::Year) => self.year,
            None => self.untagged,
        }
    }
}

/// Print the per-volume header: what gets snapshotted, where the snapshots
/// live, and the keep counts with each aggregation in its table color.
pub fn print_header(
    target: &SnapshotTarget,
    policy: &RetentionPolicy,
    palette: &Palette,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(
        out,
        "Subvolume to snapshot:              {}",
        target.source.display()
    )?;
    writeln!(
        out,
        "Snapshot will be stored in:         {}",
        target.directory.display()
    )?;
    writeln!(
        out,
        "Keep one snapshot for each of last: {} {} {} {}",
        format!("{} days,", policy.days).style(palette.day),
        format!("{} weeks,", policy.weeks).style(palette.week),
        format!("{} months,", policy.months).style(palette.month),
        format!("{} years", policy.years).style(palette.year),
    )?;
    Ok(())
}

/// Print the four-column, newest-first plan table. Cells read
/// `date: action`, both parts colored by the granularity that wants the
/// date kept; dates no rule covers render dim.
pub fn print_plan_table(
    plan: &ActionPlan,
    schedule: &RetentionSchedule,
    palette: &Palette,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Snapshot plan (create/replace/keep/delete/{{would keep but doesn't exist}}):"
    )?;

    let entries: Vec<(NaiveDate, Action)> = plan.iter_descending().collect();
    if entries.is_empty() {
        return Ok(());
    }

    // Column-major: the newest quarter of the dates runs down column one.
    let rows = (entries.len() + TABLE_COLUMNS - 1) / TABLE_COLUMNS;
    let columns: Vec<&[(NaiveDate, Action)]> = entries.chunks(rows).collect();

    for row in 0..rows {
        let mut line = String::new();
        for column in &columns {
            if let Some((date, action)) = column.get(row) {
                let style = palette.for_granularity(schedule.granularity(*date));
                let verb = action.verb();
                line.push_str(&format!("{}: {}", date.style(style), verb.style(style)));
                line.push_str(&" ".repeat(ACTION_CELL_WIDTH - verb.len()));
            }
        }
        writeln!(out, "  {}", line)?;
    }
    Ok(())
}
