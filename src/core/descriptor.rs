//! Animation state calculator.
//!
//! Maps `(phase, direction)` to a concrete pose that any animation runtime can
//! render. Nothing here holds state: for a given [`MotionProfile`] the same phase
//! and direction always produce the same [`AnimationStateDescriptor`], which is
//! what lets the state machine be tested without a rendering engine.
//!
//! | Phase    | Forward                  | Backward                 |
//! |----------|--------------------------|--------------------------|
//! | Idle     | rest                     | rest                     |
//! | Exiting  | offset `-d`, opacity 0   | offset `+d`, opacity 0   |
//! | Entering | starts at `+d`, opacity 0| starts at `-d`, opacity 0|
//!
//! While entering, [`describe`] reports the initial pose and [`animate_to`]
//! reports the rest pose the runtime should animate towards.

use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;

use crate::common::constants::*;
use crate::common::utils::interpolate_f32;
use crate::config::Config;
use crate::core::phase::{Direction, Phase};

/// Easing curve applied to animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// CSS-style cubic Bézier with control points `[x1, y1, x2, y2]`.
    /// The curve runs from `(0, 0)` to `(1, 1)`.
    CubicBezier([f32; 4]),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::CubicBezier(DEFAULT_EASING)
    }
}

impl Easing {
    /// Evaluate the curve at time progress `t`.
    ///
    /// Input is clamped to `[0.0, 1.0]`; both endpoints are exact.
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::CubicBezier([x1, y1, x2, y2]) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let curve = BezierAxis::new(x1, x2);
                let param = curve.solve(t);
                BezierAxis::new(y1, y2).at(param)
            }
        }
    }
}

/// One axis of a unit cubic Bézier in polynomial form.
struct BezierAxis {
    a: f32,
    b: f32,
    c: f32,
}

impl BezierAxis {
    fn new(p1: f32, p2: f32) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    fn at(&self, t: f32) -> f32 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    fn slope(&self, t: f32) -> f32 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }

    /// Find the curve parameter whose value on this axis equals `x`.
    ///
    /// Newton's method converges in a few steps for typical UI curves; bisection
    /// covers flat regions where the slope vanishes.
    fn solve(&self, x: f32) -> f32 {
        const EPSILON: f32 = 1e-6;

        let mut t = x;
        for _ in 0..8 {
            let error = self.at(t) - x;
            if error.abs() < EPSILON {
                return t;
            }
            let slope = self.slope(t);
            if slope.abs() < EPSILON {
                break;
            }
            t -= error / slope;
        }

        let (mut low, mut high) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let value = self.at(t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) * 0.5;
        }
        t
    }
}

/// How long a pose change takes and how it is paced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Duration in seconds.
    pub duration: f64,
    pub easing: Easing,
}

impl Timing {
    pub fn as_duration(&self) -> StdDuration {
        StdDuration::from_secs_f64(self.duration.max(0.0))
    }
}

/// The pose to render for the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationStateDescriptor {
    pub opacity: f32,
    /// Horizontal offset. Negative values sit to the left of the rest position.
    pub offset_x: f32,
    pub scale: f32,
    pub timing: Timing,
}

impl AnimationStateDescriptor {
    /// `-1`, `0` or `+1` depending on which side of rest the pose sits.
    pub fn offset_sign(&self) -> i32 {
        if self.offset_x > 0.0 {
            1
        } else if self.offset_x < 0.0 {
            -1
        } else {
            0
        }
    }

    /// True when the pose is fully visible, centred and unscaled.
    pub fn is_at_rest(&self) -> bool {
        self.opacity == 1.0 && self.offset_x == 0.0 && self.scale == 1.0
    }

    /// Interpolate every pose field towards `target`. Timing is taken from `target`.
    pub fn lerp(&self, target: &Self, progress: f32) -> Self {
        Self {
            opacity: interpolate_f32(self.opacity, target.opacity, progress),
            offset_x: interpolate_f32(self.offset_x, target.offset_x, progress),
            scale: interpolate_f32(self.scale, target.scale, progress),
            timing: target.timing,
        }
    }
}

/// The numbers the calculator works with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    pub slide_distance: f32,
    pub exit_scale: f32,
    pub exit_duration: f64,
    pub enter_duration: f64,
    pub easing: Easing,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            slide_distance: DEFAULT_SLIDE_DISTANCE,
            exit_scale: DEFAULT_EXIT_SCALE,
            exit_duration: DEFAULT_EXIT_DURATION,
            enter_duration: DEFAULT_ENTER_DURATION,
            easing: Easing::default(),
        }
    }
}

impl MotionProfile {
    /// Build a profile from configuration, falling back to defaults per field.
    pub fn from_config(config: &Config) -> Self {
        Self {
            slide_distance: config.slide_distance.unwrap_or(DEFAULT_SLIDE_DISTANCE),
            exit_scale: config.exit_scale.unwrap_or(DEFAULT_EXIT_SCALE),
            exit_duration: config.exit_duration.unwrap_or(DEFAULT_EXIT_DURATION),
            enter_duration: config.enter_duration.unwrap_or(DEFAULT_ENTER_DURATION),
            easing: Easing::CubicBezier(config.easing.unwrap_or(DEFAULT_EASING)),
        }
    }

    fn settle_timing(&self) -> Timing {
        Timing {
            duration: self.enter_duration,
            easing: self.easing,
        }
    }

    fn exit_timing(&self) -> Timing {
        Timing {
            duration: self.exit_duration,
            easing: self.easing,
        }
    }

    /// Fully visible, centred, unscaled.
    pub fn rest_pose(&self) -> AnimationStateDescriptor {
        AnimationStateDescriptor {
            opacity: 1.0,
            offset_x: 0.0,
            scale: 1.0,
            timing: self.settle_timing(),
        }
    }

    /// Pose the outgoing screen animates to. Forward slides left, backward right.
    pub fn exit_pose(&self, direction: Direction) -> AnimationStateDescriptor {
        AnimationStateDescriptor {
            opacity: 0.0,
            offset_x: -direction.factor() * self.slide_distance,
            scale: self.exit_scale,
            timing: self.exit_timing(),
        }
    }

    /// Pose the incoming screen starts from. Forward comes in from the right.
    pub fn enter_pose(&self, direction: Direction) -> AnimationStateDescriptor {
        AnimationStateDescriptor {
            opacity: 0.0,
            offset_x: direction.factor() * self.slide_distance,
            scale: self.exit_scale,
            timing: self.settle_timing(),
        }
    }
}

/// Pose to apply right now for `phase`.
pub fn describe(
    phase: Phase,
    direction: Direction,
    profile: &MotionProfile,
) -> AnimationStateDescriptor {
    match phase {
        Phase::Idle => profile.rest_pose(),
        Phase::Exiting => profile.exit_pose(direction),
        Phase::Entering => profile.enter_pose(direction),
    }
}

/// Pose the runtime should animate towards during `phase`.
pub fn animate_to(
    phase: Phase,
    direction: Direction,
    profile: &MotionProfile,
) -> AnimationStateDescriptor {
    match phase {
        Phase::Exiting => profile.exit_pose(direction),
        Phase::Idle | Phase::Entering => profile.rest_pose(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::*;

    const PHASES: [Phase; 3] = [Phase::Idle, Phase::Exiting, Phase::Entering];
    const DIRECTIONS: [Direction; 2] = [Direction::Forward, Direction::Backward];

    #[test]
    fn test_idle_is_rest_pose() {
        let profile = MotionProfile::default();
        for direction in DIRECTIONS {
            let pose = describe(Phase::Idle, direction, &profile);
            assert!(pose.is_at_rest());
            assert_eq!(pose.timing.duration, TEST_ENTER_DURATION);
        }
    }

    #[test]
    fn test_exit_pose_values() {
        let profile = MotionProfile::default();

        let forward = describe(Phase::Exiting, Direction::Forward, &profile);
        assert_eq!(forward.offset_x, -TEST_SLIDE_DISTANCE);
        assert_eq!(forward.opacity, 0.0);
        assert_eq!(forward.scale, TEST_EXIT_SCALE);
        assert_eq!(forward.timing.duration, TEST_EXIT_DURATION);

        let backward = describe(Phase::Exiting, Direction::Backward, &profile);
        assert_eq!(backward.offset_x, TEST_SLIDE_DISTANCE);
        assert_eq!(backward.timing, forward.timing);
    }

    #[test]
    fn test_enter_pose_comes_from_opposite_side() {
        let profile = MotionProfile::default();
        let forward = describe(Phase::Entering, Direction::Forward, &profile);
        assert_eq!(forward.offset_sign(), 1);
        assert_eq!(forward.opacity, 0.0);
        assert_eq!(forward.timing.duration, TEST_ENTER_DURATION);

        let backward = describe(Phase::Entering, Direction::Backward, &profile);
        assert_eq!(backward.offset_sign(), -1);
    }

    #[test]
    fn test_direction_mirroring() {
        let profile = MotionProfile::default();
        for phase in [Phase::Exiting, Phase::Entering] {
            let forward = describe(phase, Direction::Forward, &profile);
            let backward = describe(phase, Direction::Backward, &profile);
            assert_eq!(forward.offset_sign(), -backward.offset_sign());
            assert_eq!(forward.offset_x, -backward.offset_x);
        }
    }

    #[test]
    fn test_animate_to_targets() {
        let profile = MotionProfile::default();
        for direction in DIRECTIONS {
            assert!(animate_to(Phase::Entering, direction, &profile).is_at_rest());
            assert!(animate_to(Phase::Idle, direction, &profile).is_at_rest());
            assert_eq!(
                animate_to(Phase::Exiting, direction, &profile),
                describe(Phase::Exiting, direction, &profile)
            );
        }
    }

    #[test]
    fn test_describe_is_deterministic() {
        let profile = MotionProfile::default();
        for phase in PHASES {
            for direction in DIRECTIONS {
                assert_eq!(
                    describe(phase, direction, &profile),
                    describe(phase, direction, &profile)
                );
            }
        }
    }

    #[test]
    fn test_easing_endpoints() {
        let easing = Easing::CubicBezier(TEST_EASING);
        assert_eq!(easing.sample(0.0), 0.0);
        assert_eq!(easing.sample(1.0), 1.0);
        assert_eq!(easing.sample(-1.0), 0.0);
        assert_eq!(easing.sample(2.0), 1.0);
        assert_eq!(Easing::Linear.sample(0.25), 0.25);
    }

    #[test]
    fn test_easing_is_ease_out() {
        // cubic-bezier(0.2, 0.8, 0.2, 1) front-loads movement
        let easing = Easing::CubicBezier(TEST_EASING);
        let quarter = easing.sample(0.25);
        assert!(quarter > 0.5, "expected fast start, got {quarter}");
    }

    #[test]
    fn test_easing_is_monotonic() {
        let easing = Easing::CubicBezier(TEST_EASING);
        let mut previous = 0.0;
        for step in 1..=100 {
            let value = easing.sample(step as f32 / 100.0);
            assert!(value + 1e-4 >= previous, "curve went backwards at step {step}");
            previous = value;
        }
    }

    #[test]
    fn test_linear_bezier_matches_identity() {
        let easing = Easing::CubicBezier([0.0, 0.0, 1.0, 1.0]);
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            assert!((easing.sample(t) - t).abs() < 1e-3);
        }
    }

    #[test]
    fn test_lerp_moves_between_poses() {
        let profile = MotionProfile::default();
        let from = profile.enter_pose(Direction::Forward);
        let to = profile.rest_pose();

        assert_eq!(from.lerp(&to, 0.0).offset_x, from.offset_x);
        assert!(from.lerp(&to, 1.0).is_at_rest());

        let halfway = from.lerp(&to, 0.5);
        assert_eq!(halfway.offset_x, TEST_SLIDE_DISTANCE / 2.0);
        assert_eq!(halfway.opacity, 0.5);
    }
}
