use std::path::{Path, PathBuf};

use chronogrid_core::LayoutConfig;
use clap::Subcommand;

use super::{load_config, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "lanes.reuse_policy", "timed.cell_height")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

fn config_path(path: Option<&Path>) -> CliResult<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(LayoutConfig::path()?),
    }
}

pub fn run(action: ConfigAction, path: Option<&Path>) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(path)?;
            config.set(&key, &value)?;
            config.save_to(&config_path(path)?)?;
            println!("ok");
        }
        ConfigAction::List { json } => {
            let config = load_config(path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Reset => {
            let config = LayoutConfig::default();
            config.save_to(&config_path(path)?)?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", config_path(path)?.display());
        }
    }
    Ok(())
}
