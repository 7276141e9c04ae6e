//! Small helpers shared by the motion and configuration code.

use std::path::Path;

/// Linear interpolation between two `f32` values.
///
/// `progress` is clamped to `[0.0, 1.0]` so overshooting callers land on an endpoint.
pub fn interpolate_f32(start: f32, end: f32, progress: f32) -> f32 {
    let progress = progress.clamp(0.0, 1.0);
    start + (end - start) * progress
}

/// Display a path with the home directory replaced by `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}
