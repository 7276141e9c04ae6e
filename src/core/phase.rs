//! Data model for the transition sequencer: phases, directions and requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a navigation transition.
///
/// Transitions are strictly `Idle → Exiting → Entering → Idle`.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No animation in flight; the current screen is at rest.
    #[default]
    Idle,

    /// The outgoing screen is animating out. The location has not changed yet.
    Exiting,

    /// The location has changed and the incoming screen is settling into place.
    Entering,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Phase {
    /// Returns true while an animation is in flight.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns the phase that follows this one in the cycle.
    pub fn next_phase(&self) -> Self {
        match self {
            Self::Idle => Self::Exiting,
            Self::Exiting => Self::Entering,
            Self::Entering => Self::Idle,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Exiting => "Exiting",
            Self::Entering => "Entering",
        }
    }

    /// Returns the icon/symbol for this phase.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Idle => "●",
            Self::Exiting => "◀",
            Self::Entering => "▶",
        }
    }
}

/// Navigation direction. Only chooses the slide orientation.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Moving deeper into the flow (`+1`).
    #[default]
    Forward,
    /// Moving back (`-1`).
    Backward,
}

impl Direction {
    /// Convert a signed indicator into a direction. Zero has no direction.
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign.signum() {
            1 => Some(Self::Forward),
            -1 => Some(Self::Backward),
            _ => None,
        }
    }

    /// `+1` for forward, `-1` for backward.
    pub fn sign(&self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    /// Sign as a float multiplier for offsets.
    pub fn factor(&self) -> f32 {
        self.sign() as f32
    }

    pub fn reversed(&self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// A pending intent to move to a new logical location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// Destination screen identifier, e.g. a path.
    pub target: String,
    pub direction: Direction,
}

impl NavigationRequest {
    pub fn new(target: impl Into<String>, direction: Direction) -> Self {
        Self {
            target: target.into(),
            direction,
        }
    }
}

/// A phase change performed by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
}

impl Transition {
    pub(crate) fn new(from: Phase, to: Phase) -> Self {
        Self { from, to }
    }
}
