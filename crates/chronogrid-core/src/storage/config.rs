//! TOML-based layout configuration.
//!
//! Stores the knobs of the layout and window engines:
//! - Lane geometry and the lane reuse policy
//! - Hour height and cascade proximity for timed items
//! - Column/row counts and buffer sizes of the scrolling windows
//!
//! Configuration is stored at `~/.config/chronogrid/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::layout::{LaneSettings, ReusePolicy, TimedSettings};
use crate::window::{DEFAULT_DAY_BUFFER_COUNT, DEFAULT_WEEK_BUFFER_COUNT};

/// All-day lane configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanesConfig {
    #[serde(default = "default_item_height")]
    pub item_height: f64,
    #[serde(default = "default_item_gap")]
    pub item_gap: f64,
    #[serde(default = "default_min_visible_lanes")]
    pub min_visible_lanes: usize,
    #[serde(default)]
    pub reuse_policy: ReusePolicy,
}

/// Timed grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedConfig {
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
    #[serde(default = "default_proximity_threshold_px")]
    pub proximity_threshold_px: f64,
}

/// Scrolling window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_day_columns")]
    pub day_columns: usize,
    #[serde(default = "default_day_buffer_count")]
    pub day_buffer_count: usize,
    #[serde(default = "default_week_rows")]
    pub week_rows: usize,
    #[serde(default = "default_week_buffer_count")]
    pub week_buffer_count: usize,
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: Weekday,
}

/// Layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LayoutConfig {
    #[serde(default)]
    pub lanes: LanesConfig,
    #[serde(default)]
    pub timed: TimedConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

fn default_item_height() -> f64 {
    24.0
}
fn default_item_gap() -> f64 {
    4.0
}
fn default_min_visible_lanes() -> usize {
    2
}
fn default_cell_height() -> f64 {
    64.0
}
fn default_proximity_threshold_px() -> f64 {
    crate::layout::day_position::PROXIMITY_THRESHOLD_PX
}
fn default_day_columns() -> usize {
    7
}
fn default_day_buffer_count() -> usize {
    DEFAULT_DAY_BUFFER_COUNT
}
fn default_week_rows() -> usize {
    6
}
fn default_week_buffer_count() -> usize {
    DEFAULT_WEEK_BUFFER_COUNT
}
fn default_week_starts_on() -> Weekday {
    Weekday::Mon
}

impl Default for LanesConfig {
    fn default() -> Self {
        Self {
            item_height: default_item_height(),
            item_gap: default_item_gap(),
            min_visible_lanes: default_min_visible_lanes(),
            reuse_policy: ReusePolicy::default(),
        }
    }
}

impl Default for TimedConfig {
    fn default() -> Self {
        Self {
            cell_height: default_cell_height(),
            proximity_threshold_px: default_proximity_threshold_px(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            day_columns: default_day_columns(),
            day_buffer_count: default_day_buffer_count(),
            week_rows: default_week_rows(),
            week_buffer_count: default_week_buffer_count(),
            week_starts_on: default_week_starts_on(),
        }
    }
}

impl LayoutConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location: `<data dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            return Self::load_from(&path);
        }

        let cfg = Self::default();
        cfg.save_to(&path)?;
        Ok(cfg)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let cfg: LayoutConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded layout config");
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The new value must parse as the
    /// type of the value it replaces. Nothing is written to disk.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Every leaf key with its value, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (key, child) in map {
                        let path = if prefix.is_empty() {
                            key.clone()
                        } else {
                            format!("{prefix}.{key}")
                        };
                        walk(&path, child, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    pub fn lane_settings(&self) -> LaneSettings {
        LaneSettings {
            item_height: self.lanes.item_height,
            item_gap: self.lanes.item_gap,
            min_visible_lanes: self.lanes.min_visible_lanes,
            policy: self.lanes.reuse_policy,
        }
    }

    pub fn timed_settings(&self) -> TimedSettings {
        TimedSettings {
            cell_height: self.timed.cell_height,
            proximity_threshold_px: self.timed.proximity_threshold_px,
        }
    }

    /// Entries held by the day-column window.
    pub fn day_capacity(&self) -> usize {
        self.window.day_columns + 2 * self.window.day_buffer_count
    }

    /// Entries held by the week-row window.
    pub fn week_capacity(&self) -> usize {
        self.window.week_rows + 2 * self.window.week_buffer_count
    }
}
