//! Configuration validation functionality.
//!
//! Rejects values the sequencer cannot animate sensibly: out of range motion,
//! malformed easing curves and screen lists that cannot order a flow.

use anyhow::Result;
use std::collections::HashSet;

use super::Config;
use crate::common::constants::*;

/// Validate every field that is present. Missing fields are left to the defaults.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(distance) = config.slide_distance
        && !(MINIMUM_SLIDE_DISTANCE..=MAXIMUM_SLIDE_DISTANCE).contains(&distance)
    {
        anyhow::bail!(
            "slide_distance ({}) must be between {} and {}",
            distance,
            MINIMUM_SLIDE_DISTANCE,
            MAXIMUM_SLIDE_DISTANCE
        );
    }

    if let Some(scale) = config.exit_scale
        && !(MINIMUM_EXIT_SCALE..=MAXIMUM_EXIT_SCALE).contains(&scale)
    {
        anyhow::bail!(
            "exit_scale ({}) must be between {} and {}",
            scale,
            MINIMUM_EXIT_SCALE,
            MAXIMUM_EXIT_SCALE
        );
    }

    if let Some(duration) = config.exit_duration {
        validate_animation_duration(duration, "exit_duration")?;
    }
    if let Some(duration) = config.enter_duration {
        validate_animation_duration(duration, "enter_duration")?;
    }

    if let Some(easing) = config.easing {
        validate_easing(easing)?;
    }

    if let Some(timeout) = config.stall_timeout {
        validate_stall_timeout(config, timeout)?;
    }

    if let Some(screens) = &config.screens {
        validate_screens(screens)?;
    }

    if let Some(initial) = &config.initial_screen {
        if initial.is_empty() {
            anyhow::bail!("initial_screen cannot be empty");
        }
        if let Some(screens) = &config.screens
            && !screens.contains(initial)
        {
            anyhow::bail!(
                "initial_screen '{}' is not listed in screens ({})",
                initial,
                screens.join(", ")
            );
        }
    }

    if let Some(interval_ms) = config.frame_interval
        && !(MINIMUM_FRAME_INTERVAL..=MAXIMUM_FRAME_INTERVAL).contains(&interval_ms)
    {
        anyhow::bail!(
            "frame_interval ({} ms) must be between {} and {} milliseconds",
            interval_ms,
            MINIMUM_FRAME_INTERVAL,
            MAXIMUM_FRAME_INTERVAL
        );
    }

    Ok(())
}

fn validate_animation_duration(duration: f64, field_name: &str) -> Result<()> {
    if !(MINIMUM_ANIMATION_DURATION..=MAXIMUM_ANIMATION_DURATION).contains(&duration) {
        anyhow::bail!(
            "{} ({} seconds) must be between {} and {} seconds",
            field_name,
            duration,
            MINIMUM_ANIMATION_DURATION,
            MAXIMUM_ANIMATION_DURATION
        );
    }
    Ok(())
}

/// Control points must be finite and the x coordinates must stay in `[0, 1]`
/// for the curve to remain a function of time.
fn validate_easing(easing: [f32; 4]) -> Result<()> {
    if easing.iter().any(|value| !value.is_finite()) {
        anyhow::bail!("easing values must be finite numbers (got {:?})", easing);
    }

    let [x1, _, x2, _] = easing;
    for (name, x) in [("x1", x1), ("x2", x2)] {
        if !(0.0..=1.0).contains(&x) {
            anyhow::bail!("easing {} ({}) must be between 0 and 1", name, x);
        }
    }
    Ok(())
}

fn validate_stall_timeout(config: &Config, timeout: f64) -> Result<()> {
    if !timeout.is_finite() || timeout < 0.0 {
        anyhow::bail!(
            "stall_timeout ({}) must be 0 (disabled) or a positive number of seconds",
            timeout
        );
    }
    if timeout == 0.0 {
        return Ok(());
    }

    // A timeout shorter than an animation would abort every transition
    let longest = config
        .exit_duration
        .unwrap_or(DEFAULT_EXIT_DURATION)
        .max(config.enter_duration.unwrap_or(DEFAULT_ENTER_DURATION));
    if timeout <= longest {
        anyhow::bail!(
            "stall_timeout ({} seconds) must be longer than the longest animation ({} seconds)",
            timeout,
            longest
        );
    }
    Ok(())
}

fn validate_screens(screens: &[String]) -> Result<()> {
    if screens.is_empty() {
        anyhow::bail!("screens must list at least one screen");
    }

    let mut seen = HashSet::new();
    for screen in screens {
        if screen.is_empty() {
            anyhow::bail!("screens cannot contain an empty name");
        }
        if !seen.insert(screen.as_str()) {
            anyhow::bail!("screens lists '{}' more than once", screen);
        }
    }
    Ok(())
}
