use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chronogrid_core::{position_items_for_day, ItemPosition, ValidationError};
use clap::Args;
use serde::Serialize;

use super::{load_config, read_items, CliResult};

#[derive(Args)]
pub struct DayArgs {
    /// JSON file with an array of items
    #[arg(long)]
    input: PathBuf,
    /// Day to lay out (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,
    /// Hour height in pixels (default from config)
    #[arg(long)]
    cell_height: Option<f64>,
}

#[derive(Serialize)]
struct PlacedItem<'a> {
    id: &'a str,
    #[serde(flatten)]
    position: ItemPosition,
}

pub fn run(args: DayArgs, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let mut settings = config.timed_settings();
    if let Some(cell_height) = args.cell_height {
        if cell_height <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "cell_height".into(),
                message: format!("must be positive, got {cell_height}"),
            }
            .into());
        }
        settings.cell_height = cell_height;
    }

    let items = read_items(&args.input)?;
    let placed: Vec<PlacedItem> = position_items_for_day(&items, args.date, &settings)
        .into_iter()
        .map(|p| PlacedItem {
            id: &p.item.id,
            position: p.position,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&placed)?);
    Ok(())
}
