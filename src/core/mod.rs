//! Transition sequencing for animated navigation.
//!
//! The core is split along the lines the runtime needs:
//!
//! - `phase`: the Idle/Exiting/Entering phases, directions and requests
//! - `descriptor`: pure pose calculation from phase, direction and motion profile
//! - `machine`: the single-flight phase machine that calls the router once per transition
//! - `sequencer`: the façade hosts talk to, with observers and the stall watchdog
//! - `screens`: flow order used to infer slide direction
//! - `router`: the navigation seam
//! - `playback`: time-based sampling of one animation leg

pub mod descriptor;
pub mod machine;
pub mod phase;
pub mod playback;
pub mod router;
pub mod screens;
pub mod sequencer;

pub use descriptor::{AnimationStateDescriptor, Easing, MotionProfile, Timing};
pub use machine::PhaseMachine;
pub use phase::{Direction, NavigationRequest, Phase, Transition};
pub use playback::Playback;
pub use router::{HistoryRouter, Router};
pub use screens::ScreenOrder;
pub use sequencer::{CompletionOutcome, RequestOutcome, Sequencer, SubscriptionId};
