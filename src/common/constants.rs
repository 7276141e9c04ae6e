//! Default values, validation limits and exit codes shared across the crate.
//!
//! The motion defaults reproduce the page variants the navigation screens were
//! tuned with: a 50 unit slide, a barely visible scale dip, a 0.28s exit and a
//! 0.36s settle, both on the same `cubic-bezier(0.2, 0.8, 0.2, 1)` curve.

// # Motion Defaults

/// Horizontal distance a screen slides while exiting or entering.
pub const DEFAULT_SLIDE_DISTANCE: f32 = 50.0;

/// Scale applied to a screen while it is off its rest pose.
pub const DEFAULT_EXIT_SCALE: f32 = 0.99;

/// Seconds for the outgoing screen to animate away.
pub const DEFAULT_EXIT_DURATION: f64 = 0.28;

/// Seconds for the incoming screen to settle into its rest pose.
pub const DEFAULT_ENTER_DURATION: f64 = 0.36;

/// Control points of the cubic Bézier curve used by both legs.
pub const DEFAULT_EASING: [f32; 4] = [0.2, 0.8, 0.2, 1.0];

/// Navigating to the screen already shown is ignored by default.
pub const DEFAULT_SKIP_SAME_TARGET: bool = true;

/// Watchdog timeout in seconds. Zero keeps the watchdog disabled.
pub const DEFAULT_STALL_TIMEOUT: f64 = 0.0;

/// Screen ordering used to infer slide direction when none is configured.
pub const DEFAULT_SCREENS: [&str; 3] = ["welcome", "signup", "login"];

/// Milliseconds between simulated animation frames (~60 fps).
pub const DEFAULT_FRAME_INTERVAL: u64 = 16;

// # Validation Limits

pub const MINIMUM_SLIDE_DISTANCE: f32 = 0.0;
pub const MAXIMUM_SLIDE_DISTANCE: f32 = 2000.0;

pub const MINIMUM_EXIT_SCALE: f32 = 0.5;
pub const MAXIMUM_EXIT_SCALE: f32 = 1.0;

pub const MINIMUM_ANIMATION_DURATION: f64 = 0.0;
pub const MAXIMUM_ANIMATION_DURATION: f64 = 10.0;

pub const MINIMUM_FRAME_INTERVAL: u64 = 1;
pub const MAXIMUM_FRAME_INTERVAL: u64 = 1000;

/// Upper bound on how long a single simulation may run, in seconds.
pub const MAXIMUM_SIMULATION_SECONDS: f64 = 600.0;

// # Files

pub const CONFIG_DIR_NAME: &str = "slidenav";
pub const CONFIG_FILE_NAME: &str = "slidenav.toml";

// # Exit Codes

pub const EXIT_FAILURE: i32 = 1;

#[cfg(test)]
pub mod test_constants {
    pub const TEST_SLIDE_DISTANCE: f32 = 50.0;
    pub const TEST_EXIT_SCALE: f32 = 0.99;
    pub const TEST_EXIT_DURATION: f64 = 0.28;
    pub const TEST_ENTER_DURATION: f64 = 0.36;
    pub const TEST_EASING: [f32; 4] = [0.2, 0.8, 0.2, 1.0];
}
