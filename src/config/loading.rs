//! Configuration loading functionality.
//!
//! Resolves the configuration path, creates the default file when needed,
//! validates what was read and fills in defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::common::constants::*;
use crate::common::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
/// Returns an error if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
/// Returns None if using the default directory.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Load configuration using automatic path detection.
///
/// This function will create a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path.
///
/// This version does NOT create a default config if the path doesn't exist.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!(
            "Configuration file not found at {}",
            private_path(path)
        );
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)?;
    apply_defaults(&mut config);

    Ok(config)
}

/// Get the configuration file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Apply default values to configuration fields.
pub(crate) fn apply_defaults(config: &mut Config) {
    if config.slide_distance.is_none() {
        config.slide_distance = Some(DEFAULT_SLIDE_DISTANCE);
    }
    if config.exit_scale.is_none() {
        config.exit_scale = Some(DEFAULT_EXIT_SCALE);
    }

    // Animation timing
    if config.exit_duration.is_none() {
        config.exit_duration = Some(DEFAULT_EXIT_DURATION);
    }
    if config.enter_duration.is_none() {
        config.enter_duration = Some(DEFAULT_ENTER_DURATION);
    }
    if config.easing.is_none() {
        config.easing = Some(DEFAULT_EASING);
    }

    // Navigation behaviour
    if config.stall_timeout.is_none() {
        config.stall_timeout = Some(DEFAULT_STALL_TIMEOUT);
    }
    if config.skip_same_target.is_none() {
        config.skip_same_target = Some(DEFAULT_SKIP_SAME_TARGET);
    }
    if config.screens.is_none() {
        config.screens = Some(DEFAULT_SCREENS.iter().map(|s| s.to_string()).collect());
    }
    if config.initial_screen.is_none() {
        config.initial_screen = config
            .screens
            .as_ref()
            .and_then(|screens| screens.first().cloned());
    }

    if config.frame_interval.is_none() {
        config.frame_interval = Some(DEFAULT_FRAME_INTERVAL);
    }
}
