//! Configuration for the sequencer's motion and the simulation CLI.
//!
//! Settings live in `slidenav.toml`, searched in this order:
//! 1. The directory given with `--config <dir>`
//! 2. **XDG_CONFIG_HOME**/slidenav/slidenav.toml
//!
//! A commented default file is written the first time the default location is used.
//!
//! ```toml
//! #[Motion]
//! slide_distance = 50                 # Horizontal slide offset in layout units (0-2000)
//! exit_scale = 0.99                   # Scale of a screen while offset (0.5-1.0)
//! exit_duration = 0.28                # Exit animation length in seconds (0-10)
//! enter_duration = 0.36               # Entry animation length in seconds (0-10)
//! easing = [0.2, 0.8, 0.2, 1.0]       # Cubic Bézier control points x1, y1, x2, y2
//!
//! #[Navigation]
//! skip_same_target = true             # Drop requests for the screen already shown
//! stall_timeout = 0                   # Force idle after this many seconds stuck (0 = never)
//! screens = ["welcome", "signup", "login"]  # Flow order used to pick slide direction
//! initial_screen = "welcome"          # Location before the first navigation
//!
//! #[Simulation]
//! frame_interval = 16                 # Milliseconds between simulated frames (1-1000)
//! ```
//!
//! Every field is optional. Values are validated first, then missing fields are
//! filled with defaults.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use crate::common::constants::*;

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// All configurable settings. Missing fields fall back to the defaults in
/// [`constants`](crate::common::constants).
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Horizontal offset of an exiting or entering screen.
    pub slide_distance: Option<f32>,
    /// Scale applied while a screen is offset.
    pub exit_scale: Option<f32>,
    pub exit_duration: Option<f64>,  // seconds
    pub enter_duration: Option<f64>, // seconds
    /// Cubic Bézier control points `[x1, y1, x2, y2]`.
    pub easing: Option<[f32; 4]>,
    /// Seconds a phase may last before the watchdog forces idle. Zero disables it.
    pub stall_timeout: Option<f64>,
    pub skip_same_target: Option<bool>,
    pub screens: Option<Vec<String>>,
    pub initial_screen: Option<String>,
    pub frame_interval: Option<u64>, // milliseconds between simulated frames
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn frame_interval(&self) -> StdDuration {
        StdDuration::from_millis(self.frame_interval.unwrap_or(DEFAULT_FRAME_INTERVAL))
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        let easing = self.easing.unwrap_or(DEFAULT_EASING);
        log_indented!(
            "Slide: {} units, scale {}",
            self.slide_distance.unwrap_or(DEFAULT_SLIDE_DISTANCE),
            self.exit_scale.unwrap_or(DEFAULT_EXIT_SCALE)
        );
        log_indented!(
            "Durations: exit {}, enter {}",
            format_seconds(self.exit_duration.unwrap_or(DEFAULT_EXIT_DURATION)),
            format_seconds(self.enter_duration.unwrap_or(DEFAULT_ENTER_DURATION))
        );
        log_indented!(
            "Easing: cubic-bezier({}, {}, {}, {})",
            easing[0],
            easing[1],
            easing[2],
            easing[3]
        );

        if let Some(screens) = &self.screens {
            log_indented!("Screens: {}", screens.join(" → "));
        }
        if let Some(initial) = &self.initial_screen {
            log_indented!("Initial screen: {}", initial);
        }

        let stall_timeout = self.stall_timeout.unwrap_or(DEFAULT_STALL_TIMEOUT);
        if stall_timeout > 0.0 {
            log_indented!("Stall timeout: {}", format_seconds(stall_timeout));
        }
        if !self.skip_same_target.unwrap_or(DEFAULT_SKIP_SAME_TARGET) {
            log_indented!("Same-target navigation: allowed");
        }

        log_indented!(
            "Frame interval: {}ms",
            self.frame_interval.unwrap_or(DEFAULT_FRAME_INTERVAL)
        );
    }
}

/// Format a duration in seconds, dropping trailing zeros.
fn format_seconds(seconds: f64) -> String {
    let label = if seconds == 1.0 { "second" } else { "seconds" };
    if seconds.fract() == 0.0 {
        format!("{} {}", seconds as u64, label)
    } else {
        format!("{} {}", seconds, label)
    }
}
