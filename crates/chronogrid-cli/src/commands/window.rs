use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chronogrid_core::window::{
    BufferResult, DayBufferInput, DayColumns, IndexWindow, WeekBufferInput, WeekRows,
};
use chronogrid_core::{
    DayBuffer, DayCollection, LayoutConfig, RingOp, ValidationError, WeekBuffer,
};
use clap::{Args, ValueEnum};
use serde::Serialize;

use super::{load_config, read_items, CliResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    /// Day columns of the week view
    Day,
    /// Week rows of the month view
    Week,
}

#[derive(Args)]
pub struct WindowArgs {
    /// Anchor date (YYYY-MM-DD)
    #[arg(long)]
    anchor: NaiveDate,
    #[arg(long, value_enum, default_value_t = View::Day)]
    view: View,
    /// Visible columns or rows (default from config)
    #[arg(long)]
    columns: Option<usize>,
    /// Buffered entries on each side (default from config)
    #[arg(long)]
    buffer: Option<usize>,
    /// Items to position into the day columns
    #[arg(long)]
    input: Option<PathBuf>,
    /// Side-rail items (travel, journeys) for the day columns
    #[arg(long)]
    side_input: Option<PathBuf>,
    /// Comma-separated scroll steps, e.g. "2,-2,30"
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    steps: Vec<i64>,
}

#[derive(Serialize)]
struct StepLine {
    step: usize,
    base_index: i64,
    changed: bool,
    op: RingOp,
    delta: i64,
    relative_index: i64,
    capacity: usize,
    start: NaiveDate,
    end: NaiveDate,
    window: IndexWindow,
    entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    side_entries: Option<usize>,
}

impl StepLine {
    fn new<I>(step: usize, base_index: i64, changed: bool, result: &BufferResult<I>, entries: usize) -> Self {
        let meta = result.meta();
        Self {
            step,
            base_index,
            changed,
            op: meta.op,
            delta: meta.delta,
            relative_index: meta.relative_index,
            capacity: meta.capacity,
            start: result.range.start,
            end: result.range.end,
            window: result.window,
            entries,
            side_entries: None,
        }
    }

    fn print(&self) -> CliResult {
        println!("{}", serde_json::to_string(self)?);
        Ok(())
    }
}

/// Largest window the command will buffer.
const MAX_CAPACITY: usize = 4096;

/// Base index after each step, the seed included.
fn base_indices(start: i64, steps: &[i64]) -> Result<Vec<i64>, ValidationError> {
    let mut current = start;
    let mut out = vec![current];
    for step in steps {
        current = current
            .checked_add(*step)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "steps".into(),
                message: format!("scrolling by {step} from {current} overflows the base index"),
            })?;
        out.push(current);
    }
    Ok(out)
}

/// Visible entries plus both buffers, bounded by [`MAX_CAPACITY`].
fn checked_capacity(count: usize, buffer_count: usize) -> Result<usize, ValidationError> {
    buffer_count
        .checked_mul(2)
        .and_then(|buffers| buffers.checked_add(count))
        .filter(|capacity| *capacity <= MAX_CAPACITY)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "window".into(),
            message: format!(
                "{count} entries with {buffer_count} buffered on each side exceed {MAX_CAPACITY}"
            ),
        })
}

/// Centre-relative base index that seeds the window.
fn seed_index(center: i64, buffer_count: usize) -> Result<i64, ValidationError> {
    i64::try_from(buffer_count)
        .ok()
        .and_then(|buffer| center.checked_sub(buffer))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "buffer".into(),
            message: format!("{buffer_count} is too large"),
        })
}

pub fn run(args: WindowArgs, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    match args.view {
        View::Day => run_days(&args, &config),
        View::Week => run_weeks(&args, &config),
    }
}

fn run_days(args: &WindowArgs, config: &LayoutConfig) -> CliResult {
    let buffer_count = args.buffer.unwrap_or(config.window.day_buffer_count);
    let columns = DayColumns {
        count: args.columns.unwrap_or(config.window.day_columns),
        center: 0,
    };

    checked_capacity(columns.count, buffer_count)?;

    let items = match &args.input {
        Some(path) => read_items(path)?,
        None => Vec::new(),
    };
    let side_items = match &args.side_input {
        Some(path) => read_items(path)?,
        None => Vec::new(),
    };
    let settings = config.timed_settings();

    let mut buffer = DayBuffer::new();
    let seed = seed_index(columns.center, buffer_count)?;
    for (step, base_index) in base_indices(seed, &args.steps)?.into_iter().enumerate() {
        // position only the days this step can show; the item set and its
        // version stay the same across steps
        let range = columns.window_range(args.anchor, base_index, buffer_count)?;
        let collection = DayCollection::build(&items, range, &settings, "cli")
            .with_side_items(&side_items, settings.cell_height);

        let mut input = DayBufferInput::new(args.anchor, columns, &collection);
        input.buffer_count = buffer_count;
        input.base_index = base_index;

        let changed = buffer.derive(&input)?;
        let result = buffer.result()?;
        let days = result.items();
        let mut line = StepLine::new(
            step,
            base_index,
            changed,
            result,
            days.iter().map(|day| day.items.len()).sum(),
        );
        line.side_entries = Some(days.iter().map(|day| day.side_items.len()).sum());
        line.print()?;
    }
    Ok(())
}

fn run_weeks(args: &WindowArgs, config: &LayoutConfig) -> CliResult {
    let rows = WeekRows {
        count: args.columns.unwrap_or(config.window.week_rows),
        center: 0,
    };
    let mut input = WeekBufferInput::new(args.anchor, rows, config.window.week_starts_on);
    input.buffer_count = args.buffer.unwrap_or(config.window.week_buffer_count);
    checked_capacity(rows.count, input.buffer_count)?;

    let mut buffer = WeekBuffer::new();
    let seed = seed_index(rows.center, input.buffer_count)?;
    for (step, base_index) in base_indices(seed, &args.steps)?.into_iter().enumerate() {
        input.base_index = base_index;
        let changed = buffer.derive(&input)?;
        let result = buffer.result()?;
        StepLine::new(step, base_index, changed, result, result.items().len()).print()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_indices_accumulate_steps() {
        assert_eq!(base_indices(-14, &[2, -2, 30]).unwrap(), vec![-14, -12, -14, 16]);
        assert_eq!(base_indices(0, &[]).unwrap(), vec![0]);
    }

    #[test]
    fn base_indices_reject_overflow() {
        assert!(base_indices(-14, &[i64::MIN]).is_err());
        assert!(base_indices(1, &[i64::MAX]).is_err());
    }

    #[test]
    fn capacity_is_bounded() {
        assert_eq!(checked_capacity(7, 14).unwrap(), 35);
        assert!(checked_capacity(7, usize::MAX).is_err());
        assert!(checked_capacity(MAX_CAPACITY, 1).is_err());
    }
}
