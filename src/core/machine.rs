//! Phase state machine.
//!
//! Enforces single-flight navigation and sequences the two animation legs around
//! exactly one real navigation:
//!
//! | From     | Event                         | To       | Side effect            |
//! |----------|-------------------------------|----------|------------------------|
//! | Idle     | `request_navigation`          | Exiting  | store target+direction |
//! | Exiting  | `on_exit_animation_complete`  | Entering | `router.navigate`      |
//! | Entering | `on_enter_animation_complete` | Idle     | clear pending request  |
//!
//! Every other pairing is a silent no-op. Duplicate completion signals from the
//! rendering runtime are therefore harmless.

use crate::core::descriptor::{self, AnimationStateDescriptor, MotionProfile};
use crate::core::phase::{Direction, NavigationRequest, Phase, Transition};
use crate::core::router::Router;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseMachine {
    phase: Phase,
    pending: Option<NavigationRequest>,
    /// Direction of the most recent accepted request, used once idle.
    last_direction: Direction,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> Option<&NavigationRequest> {
        self.pending.as_ref()
    }

    /// Direction of the request in flight, or the last one once idle.
    pub fn direction(&self) -> Direction {
        self.pending
            .as_ref()
            .map_or(self.last_direction, |request| request.direction)
    }

    /// Accept a navigation request if idle. Dropped otherwise.
    pub fn request_navigation(
        &mut self,
        target: impl Into<String>,
        direction: Direction,
    ) -> Option<Transition> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.pending = Some(NavigationRequest::new(target, direction));
        self.last_direction = direction;
        Some(self.advance(Phase::Exiting))
    }

    /// Exit leg finished: perform the real navigation and start entering.
    pub fn on_exit_animation_complete<R>(&mut self, router: &mut R) -> Option<Transition>
    where
        R: Router + ?Sized,
    {
        if self.phase != Phase::Exiting {
            return None;
        }
        let request = self.pending.as_ref()?;
        router.navigate(&request.target);
        Some(self.advance(Phase::Entering))
    }

    /// Enter leg finished: settle back to idle.
    pub fn on_enter_animation_complete(&mut self) -> Option<Transition> {
        if self.phase != Phase::Entering {
            return None;
        }
        self.pending = None;
        Some(self.advance(Phase::Idle))
    }

    /// Abandon whatever is in flight and return to idle without navigating.
    pub fn force_idle(&mut self) -> Option<Transition> {
        if self.phase == Phase::Idle {
            return None;
        }
        self.pending = None;
        Some(self.advance(Phase::Idle))
    }

    /// Pose for the current phase. Pure read.
    pub fn current_descriptor(&self, profile: &MotionProfile) -> AnimationStateDescriptor {
        descriptor::describe(self.phase, self.direction(), profile)
    }

    /// Pose the current animation should end on. Pure read.
    pub fn target_descriptor(&self, profile: &MotionProfile) -> AnimationStateDescriptor {
        descriptor::animate_to(self.phase, self.direction(), profile)
    }

    fn advance(&mut self, to: Phase) -> Transition {
        let transition = Transition::new(self.phase, to);
        self.phase = to;
        transition
    }
}
