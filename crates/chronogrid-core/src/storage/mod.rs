mod config;

pub use config::{LanesConfig, LayoutConfig, TimedConfig, WindowConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Directory name for an environment: `chronogrid-dev` when `env` is
/// `dev`, `chronogrid` otherwise.
fn dir_name(env: &str) -> &'static str {
    if env == "dev" {
        "chronogrid-dev"
    } else {
        "chronogrid"
    }
}

/// Returns `~/.config/chronogrid[-dev]/` based on CHRONOGRID_ENV.
///
/// Set CHRONOGRID_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CHRONOGRID_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = base_dir.join(dir_name(&env));

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_environment_uses_separate_directory() {
        assert_eq!(dir_name("dev"), "chronogrid-dev");
        assert_eq!(dir_name("production"), "chronogrid");
        assert_eq!(dir_name(""), "chronogrid");
    }
}
