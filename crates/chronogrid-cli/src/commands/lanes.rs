use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chronogrid_core::layout::{all_day_items_for_days, layout_all_day, ColumnRange};
use chronogrid_core::{organize_with_overflow, DayRange, DisplayItem, ReusePolicy, ValidationError};
use clap::Args;
use serde::Serialize;

use super::{load_config, read_items, CliResult};

#[derive(Args)]
pub struct LanesArgs {
    /// JSON file with an array of items
    #[arg(long)]
    input: PathBuf,
    /// First column (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,
    /// Last column, inclusive
    #[arg(long)]
    to: NaiveDate,
    /// Header height in pixels; enables the overflow split
    #[arg(long)]
    height: Option<f64>,
    /// soonest-reuse or most-recent-reuse (default from config)
    #[arg(long)]
    policy: Option<ReusePolicy>,
    /// Start of the visible sub-range used for the active lane count
    #[arg(long, requires = "visible_to")]
    visible_from: Option<NaiveDate>,
    #[arg(long, requires = "visible_from")]
    visible_to: Option<NaiveDate>,
}

#[derive(Serialize)]
struct LaneEntry<'a> {
    id: &'a str,
    lane: usize,
    start_index: i64,
    span: i64,
}

#[derive(Serialize)]
struct LanesOutput<'a> {
    from: NaiveDate,
    to: NaiveDate,
    policy: ReusePolicy,
    total_lanes: usize,
    visible_lanes: usize,
    active_lanes: usize,
    items: Vec<LaneEntry<'a>>,
    overflow: Vec<String>,
}

pub fn run(args: LanesArgs, config_path: Option<&Path>) -> CliResult {
    if args.to < args.from {
        return Err(ValidationError::InvalidValue {
            field: "to".into(),
            message: format!("{} is before --from {}", args.to, args.from),
        }
        .into());
    }

    let config = load_config(config_path)?;
    let mut settings = config.lane_settings();
    if let Some(policy) = args.policy {
        settings.policy = policy;
    }

    let items = read_items(&args.input)?;
    let columns = ColumnRange {
        start: args.from,
        end: args.to,
        start_index: 0,
    };
    let visible = match (args.visible_from, args.visible_to) {
        (Some(start), Some(end)) => DayRange::new(start, end),
        _ => columns.days(),
    };

    let layout = layout_all_day(&items, &columns, &visible, settings.policy);
    let total_lanes = layout
        .items
        .iter()
        .map(|positioned| positioned.lane + 1)
        .max()
        .unwrap_or(0);

    let (visible_lanes, overflow) = match args.height {
        Some(height) => {
            let days: Vec<NaiveDate> = columns.days().days().collect();
            let candidates: Vec<DisplayItem> = all_day_items_for_days(&items, &days)
                .into_iter()
                .cloned()
                .collect();
            let split = organize_with_overflow(&candidates, height, &settings);
            let hidden: Vec<String> = split
                .overflow_items()
                .iter()
                .map(|item| item.id.clone())
                .collect();
            (split.visible_lanes.len(), hidden)
        }
        None => (total_lanes, Vec::new()),
    };

    let output = LanesOutput {
        from: args.from,
        to: args.to,
        policy: settings.policy,
        total_lanes,
        visible_lanes,
        active_lanes: layout.active_lanes,
        items: layout
            .items
            .iter()
            .map(|positioned| LaneEntry {
                id: &positioned.item.id,
                lane: positioned.lane,
                start_index: positioned.start_index,
                span: positioned.span,
            })
            .collect(),
        overflow,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
