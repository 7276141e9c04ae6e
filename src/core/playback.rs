//! Playback of a single animation leg.
//!
//! A generic stand-in for a rendering runtime: given the pose a screen starts in
//! and the pose it should end in, [`Playback`] reports the eased pose for any
//! moment and whether the leg has finished. Progress is linear in time over the
//! target's duration; the easing curve then shapes the pose.

use chrono::{DateTime, Local};
use std::time::Duration as StdDuration;

use crate::core::descriptor::AnimationStateDescriptor;
use crate::time_source::{TimeSource, elapsed_since};

#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    from: AnimationStateDescriptor,
    to: AnimationStateDescriptor,
    started_at: DateTime<Local>,
    duration: StdDuration,
}

impl Playback {
    /// Start animating from `from` to `to`. Timing comes from `to`.
    pub fn start(
        from: AnimationStateDescriptor,
        to: AnimationStateDescriptor,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            from,
            to,
            started_at,
            duration: to.timing.as_duration(),
        }
    }

    pub fn duration(&self) -> StdDuration {
        self.duration
    }

    pub fn target(&self) -> &AnimationStateDescriptor {
        &self.to
    }

    /// Fraction of the duration elapsed, in `[0.0, 1.0]`.
    pub fn progress(&self, clock: &dyn TimeSource) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = elapsed_since(clock, self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// Eased pose at the clock's current time.
    pub fn sample(&self, clock: &dyn TimeSource) -> AnimationStateDescriptor {
        let progress = self.progress(clock);
        if progress >= 1.0 {
            return self.to;
        }
        let eased = self.to.timing.easing.sample(progress);
        self.from.lerp(&self.to, eased)
    }

    pub fn is_finished(&self, clock: &dyn TimeSource) -> bool {
        self.progress(clock) >= 1.0
    }
}
