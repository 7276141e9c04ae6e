//! Default configuration file creation.
//!
//! Writes a commented `slidenav.toml` holding every default, aligned so the
//! comments line up in one column.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::common::constants::*;
use crate::common::utils::private_path;

/// Create a default config file at `path`, creating parent directories as needed.
pub fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", private_path(path)))?;

    log_block_start!("Created default config: {}", private_path(path));
    Ok(())
}

/// Contents of the default configuration file.
pub(crate) fn default_config_content() -> String {
    ConfigBuilder::new()
        .add_section("Motion")
        .add_setting(
            "slide_distance",
            &format!("{DEFAULT_SLIDE_DISTANCE:?}"),
            &format!(
                "Horizontal slide offset in layout units ({MINIMUM_SLIDE_DISTANCE}-{MAXIMUM_SLIDE_DISTANCE})"
            ),
        )
        .add_setting(
            "exit_scale",
            &format!("{DEFAULT_EXIT_SCALE:?}"),
            &format!("Scale of a screen while offset ({MINIMUM_EXIT_SCALE}-{MAXIMUM_EXIT_SCALE})"),
        )
        .add_setting(
            "exit_duration",
            &format!("{DEFAULT_EXIT_DURATION:?}"),
            &format!("Exit animation length in seconds (0-{MAXIMUM_ANIMATION_DURATION})"),
        )
        .add_setting(
            "enter_duration",
            &format!("{DEFAULT_ENTER_DURATION:?}"),
            &format!("Entry animation length in seconds (0-{MAXIMUM_ANIMATION_DURATION})"),
        )
        .add_setting(
            "easing",
            &format!("{DEFAULT_EASING:?}"),
            "Cubic Bézier control points x1, y1, x2, y2",
        )
        .add_section("Navigation")
        .add_setting(
            "skip_same_target",
            &DEFAULT_SKIP_SAME_TARGET.to_string(),
            "Drop requests for the screen already shown",
        )
        .add_setting(
            "stall_timeout",
            &format!("{DEFAULT_STALL_TIMEOUT:?}"),
            "Force idle after this many seconds stuck mid-transition (0 = never)",
        )
        .add_setting(
            "screens",
            &format!("{DEFAULT_SCREENS:?}"),
            "Flow order used to pick the slide direction",
        )
        .add_setting(
            "initial_screen",
            &format!("{:?}", DEFAULT_SCREENS[0]),
            "Location before the first navigation",
        )
        .add_section("Simulation")
        .add_setting(
            "frame_interval",
            &DEFAULT_FRAME_INTERVAL.to_string(),
            &format!(
                "Milliseconds between simulated frames ({MINIMUM_FRAME_INTERVAL}-{MAXIMUM_FRAME_INTERVAL})"
            ),
        )
        .build()
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        // Widest setting line plus one space before the comment
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        for (index, entry) in self.entries.into_iter().enumerate() {
            match entry {
                ConfigEntry::Section(title) => {
                    if index > 0 {
                        result.push(String::new());
                    }
                    result.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}
