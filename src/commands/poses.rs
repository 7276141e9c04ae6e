//! Pose table for the loaded motion configuration.
//!
//! Prints what a screen looks like in every phase and direction: the pose
//! applied immediately and the pose the animation heads towards.

use anyhow::Result;

use crate::core::descriptor::{self, AnimationStateDescriptor, Easing, MotionProfile};
use crate::core::phase::{Direction, Phase};

/// One line of the pose table.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRow {
    pub phase: Phase,
    pub direction: Direction,
    pub start: AnimationStateDescriptor,
    pub target: AnimationStateDescriptor,
}

/// Every phase and direction combination for `profile`.
pub fn pose_table(profile: &MotionProfile) -> Vec<PoseRow> {
    [Phase::Idle, Phase::Exiting, Phase::Entering]
        .into_iter()
        .flat_map(|phase| {
            [Direction::Forward, Direction::Backward]
                .into_iter()
                .map(move |direction| {
                    // The exit leg starts from rest, not from the pose applied while exiting
                    let start = match phase {
                        Phase::Exiting => profile.rest_pose(),
                        _ => descriptor::describe(phase, direction, profile),
                    };
                    PoseRow {
                        phase,
                        direction,
                        start,
                        target: descriptor::animate_to(phase, direction, profile),
                    }
                })
        })
        .collect()
}

fn format_pose(pose: &AnimationStateDescriptor) -> String {
    format!(
        "opacity {:.2}  offset {:+7.1}  scale {:.3}",
        pose.opacity, pose.offset_x, pose.scale
    )
}

fn format_easing(easing: &Easing) -> String {
    match easing {
        Easing::Linear => "linear".to_string(),
        Easing::CubicBezier([x1, y1, x2, y2]) => {
            format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
        }
    }
}

/// Handle the poses command.
pub fn handle_poses_command(debug_enabled: bool, config_dir: Option<String>) -> Result<()> {
    log_version!();

    let config = super::load_config(config_dir)?;
    if debug_enabled {
        config.log_config();
    }
    let profile = MotionProfile::from_config(&config);

    log_block_start!(
        "Exit {:.2}s, enter {:.2}s, {}",
        profile.exit_duration,
        profile.enter_duration,
        format_easing(&profile.easing)
    );

    for row in pose_table(&profile) {
        log_decorated!(
            "{} {:<8} {:<8} {}",
            row.phase.symbol(),
            row.phase.display_name(),
            row.direction.to_string(),
            format_pose(&row.start)
        );
        // Idle has nothing to animate
        if row.start != row.target {
            log_indented!(
                "                  → {}  over {:.2}s",
                format_pose(&row.target),
                row.target.timing.duration
            );
        }
    }

    log_end!();
    Ok(())
}

/// Display help for the poses command
pub fn display_help() {
    log_version!();
    log_block_start!("poses - Print the pose table");
    log_block_start!("Usage: slidenav poses");
    log_block_start!("Description:");
    log_indented!("Shows opacity, offset and scale for every phase and direction");
    log_indented!("using the motion settings from the loaded configuration.");
    log_indented!("Lines with an arrow animate from the first pose to the second.");
    log_end!();
}
