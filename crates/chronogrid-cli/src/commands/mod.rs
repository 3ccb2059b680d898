pub mod completions;
pub mod config;
pub mod day;
pub mod lanes;
pub mod window;

use std::path::Path;

use chronogrid_core::{DisplayItem, LayoutConfig};
use tracing::debug;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> CliResult<LayoutConfig> {
    let config = match path {
        Some(path) => LayoutConfig::load_from(path)?,
        None => LayoutConfig::load()?,
    };
    Ok(config)
}

/// Read a JSON array of items and validate each one.
pub fn read_items(path: &Path) -> chronogrid_core::Result<Vec<DisplayItem>> {
    let content = std::fs::read_to_string(path)?;
    let items: Vec<DisplayItem> = serde_json::from_str(&content)?;
    for item in &items {
        item.validate()?;
    }
    debug!(count = items.len(), path = %path.display(), "read items");
    Ok(items)
}
