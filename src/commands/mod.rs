//! Command-line command handlers for slidenav.
//!
//! Each command lives in its own submodule and returns `anyhow::Result` to
//! main, which owns process exit codes.

pub mod help;
pub mod poses;
pub mod simulate;

use anyhow::Result;

use crate::common::utils::private_path;
use crate::config::{self, Config};

/// Load the configuration after honouring `--config`.
pub(crate) fn load_config(config_dir: Option<String>) -> Result<Config> {
    config::set_config_dir(config_dir)?;
    let config = Config::load()?;
    if let Ok(path) = Config::get_config_path() {
        log_debug!("Configuration file: {}", private_path(&path));
    }
    Ok(config)
}
