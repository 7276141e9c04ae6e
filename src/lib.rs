//! # slidenav
//!
//! Sequencing for animated screen navigation.
//!
//! A [`Sequencer`](core::Sequencer) makes sure the outgoing screen finishes its
//! exit animation before the location changes, and that the incoming screen
//! only starts its entry animation once the new location is in place.
//! Transitions never overlap and are never queued: requests made while one is
//! in flight are dropped.
//!
//! ## Architecture
//!
//! - **Core**: `core` holds the phase machine, the pose calculator and the
//!   sequencer façade, plus the router seam and screen ordering
//! - **Events**: `events` defines what observers receive
//! - **Simulation**: `simulate` drives a sequencer through a scripted click
//!   timeline on any `TimeSource`
//! - **Configuration**: `config` for TOML-based motion settings
//! - **Commands**: `args` and `commands` for the `slidenav` binary
//! - **Infrastructure**: logging, time sources and signal handling

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod commands;
pub mod config;
pub mod core;
pub mod events;
pub mod signals;
pub mod simulate;
pub mod time_source;

pub use crate::core::{
    AnimationStateDescriptor, CompletionOutcome, Direction, HistoryRouter, MotionProfile, Phase,
    RequestOutcome, Router, Sequencer,
};
pub use events::{DropReason, SequencerEvent};
