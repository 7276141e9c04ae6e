//! Event data structures broadcast by the sequencer.
//!
//! Observers subscribed to a [`Sequencer`](crate::core::Sequencer) receive these
//! for every state change and every dropped call. They serialize with an
//! `event_type` tag so the `simulate --json` output can be consumed line by line.

use serde::{Deserialize, Serialize};

use crate::core::phase::{Direction, Phase};

/// Why a navigation request was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "phase")]
pub enum DropReason {
    /// Another transition is in flight.
    Busy(Phase),
    /// The target identifier was empty.
    EmptyTarget,
    /// The target is the location already shown.
    AlreadyThere,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::Busy(phase) => write!(f, "busy ({phase})"),
            DropReason::EmptyTarget => write!(f, "empty target"),
            DropReason::AlreadyThere => write!(f, "already there"),
        }
    }
}

/// All events a sequencer can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SequencerEvent {
    /// The phase changed.
    PhaseChanged {
        from: Phase,
        to: Phase,
        /// Target of the transition in flight (or just finished).
        target: Option<String>,
        direction: Direction,
    },

    /// The router was told to change location.
    Navigated { target: String },

    /// A navigation request was dropped.
    RequestDropped { target: String, reason: DropReason },

    /// A completion callback arrived with nothing to complete.
    CompletionIgnored { phase: Phase },

    /// The watchdog forced the sequencer back to idle.
    Stalled { phase: Phase, elapsed_ms: u64 },
}

impl SequencerEvent {
    pub fn phase_changed(
        from: Phase,
        to: Phase,
        target: Option<String>,
        direction: Direction,
    ) -> Self {
        SequencerEvent::PhaseChanged {
            from,
            to,
            target,
            direction,
        }
    }

    pub fn navigated(target: impl Into<String>) -> Self {
        SequencerEvent::Navigated {
            target: target.into(),
        }
    }

    pub fn request_dropped(target: impl Into<String>, reason: DropReason) -> Self {
        SequencerEvent::RequestDropped {
            target: target.into(),
            reason,
        }
    }

    /// One-line human readable summary, used by the CLI.
    pub fn summary(&self) -> String {
        match self {
            SequencerEvent::PhaseChanged {
                from, to, target, ..
            } => match target {
                Some(target) => format!("{from} → {to} ({target})"),
                None => format!("{from} → {to}"),
            },
            SequencerEvent::Navigated { target } => format!("Navigated to {target}"),
            SequencerEvent::RequestDropped { target, reason } => {
                format!("Dropped request for {target}: {reason}")
            }
            SequencerEvent::CompletionIgnored { phase } => {
                format!("Ignored completion while {phase}")
            }
            SequencerEvent::Stalled { phase, elapsed_ms } => {
                format!("Stalled in {phase} for {elapsed_ms}ms, reset to Idle")
            }
        }
    }
}
