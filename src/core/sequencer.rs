//! Sequencer façade: the single entry point for screens, routers and animation runtimes.
//!
//! The [`Sequencer`] wraps the [`PhaseMachine`] and the descriptor calculator and
//! adds what a host application needs around them:
//!
//! - one completion callback, [`Sequencer::notify_animation_complete`], that works
//!   out whether a finished animation means "navigate now" or "settle now"
//! - observers that are told about every phase change, navigation and dropped call
//! - a busy signal so a UI can disable its controls while a transition runs
//! - an optional stall watchdog for runtimes that never report completion
//!
//! It owns all of its state; nothing is global. Hosts pass the sequencer (or a
//! reference to it) to whichever component renders the current pose.
//!
//! # Example
//! ```
//! use slidenav::core::{CompletionOutcome, Direction, HistoryRouter, Phase, Sequencer};
//!
//! let mut sequencer = Sequencer::new(HistoryRouter::starting_at("welcome"))
//!     .with_initial_location("welcome");
//!
//! sequencer.request_navigation("signup", Direction::Forward);
//! assert_eq!(sequencer.phase(), Phase::Exiting);
//!
//! let outcome = sequencer.notify_animation_complete();
//! assert_eq!(outcome, CompletionOutcome::Navigated("signup".to_string()));
//! sequencer.notify_animation_complete();
//! assert_eq!(sequencer.router().current(), Some("signup"));
//! ```

use chrono::{DateTime, Local};
use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::common::constants::*;
use crate::config::Config;
use crate::core::descriptor::{AnimationStateDescriptor, MotionProfile};
use crate::core::machine::PhaseMachine;
use crate::core::phase::{Direction, NavigationRequest, Phase, Transition};
use crate::core::router::Router;
use crate::core::screens::ScreenOrder;
use crate::events::{DropReason, SequencerEvent};
use crate::time_source::{RealTimeSource, TimeSource, elapsed_since};

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Accepted(Direction),
    Dropped(DropReason),
}

impl RequestOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RequestOutcome::Accepted(_))
    }
}

/// What a completion callback turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The exit leg finished and the router was sent to this target.
    Navigated(String),
    /// The enter leg finished and the sequencer is idle again.
    Settled,
    /// Nothing was in flight.
    Ignored,
}

/// Handle returned by [`Sequencer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SequencerEvent)>;

pub struct Sequencer<R: Router> {
    machine: PhaseMachine,
    router: R,
    profile: MotionProfile,
    screens: ScreenOrder,
    /// Last location the router was sent to (or the configured start screen).
    location: Option<String>,
    skip_same_target: bool,
    stall_timeout: Option<StdDuration>,
    clock: Arc<dyn TimeSource>,
    phase_started_at: DateTime<Local>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<R: Router> fmt::Debug for Sequencer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("machine", &self.machine)
            .field("profile", &self.profile)
            .field("screens", &self.screens)
            .field("location", &self.location)
            .field("skip_same_target", &self.skip_same_target)
            .field("stall_timeout", &self.stall_timeout)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<R: Router> Sequencer<R> {
    /// Create a sequencer with default motion, screen order and no watchdog.
    pub fn new(router: R) -> Self {
        let clock: Arc<dyn TimeSource> = Arc::new(RealTimeSource);
        let phase_started_at = clock.now();
        Self {
            machine: PhaseMachine::new(),
            router,
            profile: MotionProfile::default(),
            screens: ScreenOrder::default(),
            location: None,
            skip_same_target: DEFAULT_SKIP_SAME_TARGET,
            stall_timeout: None,
            clock,
            phase_started_at,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a sequencer configured from a loaded [`Config`].
    pub fn from_config(router: R, config: &Config) -> Self {
        let mut sequencer = Self::new(router)
            .with_profile(MotionProfile::from_config(config))
            .with_skip_same_target(config.skip_same_target.unwrap_or(DEFAULT_SKIP_SAME_TARGET))
            .with_stall_timeout(stall_timeout_from_secs(
                config.stall_timeout.unwrap_or(DEFAULT_STALL_TIMEOUT),
            ));
        if let Some(screens) = &config.screens {
            sequencer = sequencer.with_screens(ScreenOrder::new(screens.iter().cloned()));
        }
        if let Some(initial) = &config.initial_screen {
            sequencer = sequencer.with_initial_location(initial.clone());
        }
        sequencer
    }

    pub fn with_profile(mut self, profile: MotionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_screens(mut self, screens: ScreenOrder) -> Self {
        self.screens = screens;
        self
    }

    /// Location shown before the first navigation.
    pub fn with_initial_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_skip_same_target(mut self, skip: bool) -> Self {
        self.skip_same_target = skip;
        self
    }

    /// Force a return to idle once a phase lasts longer than `timeout`.
    /// `None` disables the watchdog.
    pub fn with_stall_timeout(mut self, timeout: Option<StdDuration>) -> Self {
        self.stall_timeout = timeout;
        self
    }

    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.set_time_source(clock);
        self
    }

    /// Swap the clock used by the watchdog. The current phase restarts its timer.
    pub fn set_time_source(&mut self, clock: Arc<dyn TimeSource>) {
        self.phase_started_at = clock.now();
        self.clock = clock;
    }

    // # Reads

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn pending(&self) -> Option<&NavigationRequest> {
        self.machine.pending()
    }

    /// True while a transition is in flight and new requests would be dropped.
    pub fn is_busy(&self) -> bool {
        self.machine.phase().is_busy()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    pub fn screens(&self) -> &ScreenOrder {
        &self.screens
    }

    pub fn stall_timeout(&self) -> Option<StdDuration> {
        self.stall_timeout
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    /// Pose to apply right now. Idempotent.
    pub fn get_render_descriptor(&self) -> AnimationStateDescriptor {
        self.machine.current_descriptor(&self.profile)
    }

    /// Pose the current animation should end on.
    pub fn animation_target(&self) -> AnimationStateDescriptor {
        self.machine.target_descriptor(&self.profile)
    }

    /// The animation the runtime should be playing, as `(from, to)`.
    ///
    /// While exiting the screen leaves its rest pose; while entering it starts
    /// from the offset pose. Idle has nothing to play.
    pub fn current_leg(&self) -> Option<(AnimationStateDescriptor, AnimationStateDescriptor)> {
        match self.phase() {
            Phase::Idle => None,
            Phase::Exiting => Some((self.profile.rest_pose(), self.animation_target())),
            Phase::Entering => Some((self.get_render_descriptor(), self.animation_target())),
        }
    }

    // # Mutations

    /// Ask to move to `target`. Dropped unless idle.
    pub fn request_navigation(
        &mut self,
        target: impl Into<String>,
        direction: Direction,
    ) -> RequestOutcome {
        let target = target.into();

        let rejection = if target.is_empty() {
            Some(DropReason::EmptyTarget)
        } else if self.is_busy() {
            Some(DropReason::Busy(self.phase()))
        } else if self.skip_same_target && self.location.as_deref() == Some(target.as_str()) {
            Some(DropReason::AlreadyThere)
        } else {
            None
        };

        if let Some(reason) = rejection {
            log_debug!("Navigation to '{}' dropped: {}", target, reason);
            self.emit(SequencerEvent::request_dropped(target, reason));
            return RequestOutcome::Dropped(reason);
        }

        match self.machine.request_navigation(target, direction) {
            Some(transition) => {
                self.record_transition(transition);
                RequestOutcome::Accepted(direction)
            }
            None => RequestOutcome::Dropped(DropReason::Busy(self.phase())),
        }
    }

    /// Ask to move to `target`, choosing the direction from the screen order.
    pub fn navigate_to(&mut self, target: impl Into<String>) -> RequestOutcome {
        let target = target.into();
        let direction = self
            .screens
            .direction_between(self.location.as_deref(), &target);
        self.request_navigation(target, direction)
    }

    /// Single completion callback for whichever animation just finished.
    pub fn notify_animation_complete(&mut self) -> CompletionOutcome {
        match self.phase() {
            Phase::Exiting => {
                let Some(transition) = self.machine.on_exit_animation_complete(&mut self.router)
                else {
                    return self.ignore_completion();
                };
                let target = self
                    .machine
                    .pending()
                    .map(|request| request.target.clone())
                    .unwrap_or_default();
                self.location = Some(target.clone());
                self.emit(SequencerEvent::navigated(target.clone()));
                self.record_transition(transition);
                CompletionOutcome::Navigated(target)
            }
            Phase::Entering => {
                // Keep the target for the event before the machine clears it
                let target = self.machine.pending().map(|r| r.target.clone());
                match self.machine.on_enter_animation_complete() {
                    Some(transition) => {
                        self.record_transition_with_target(transition, target);
                        CompletionOutcome::Settled
                    }
                    None => self.ignore_completion(),
                }
            }
            Phase::Idle => self.ignore_completion(),
        }
    }

    /// Run the stall watchdog. Returns true if the sequencer was reset.
    ///
    /// Without a configured timeout this never does anything.
    pub fn check_stalled(&mut self) -> bool {
        let Some(timeout) = self.stall_timeout else {
            return false;
        };
        if !self.is_busy() {
            return false;
        }

        let elapsed = elapsed_since(self.clock.as_ref(), self.phase_started_at);
        if elapsed <= timeout {
            return false;
        }

        let phase = self.phase();
        let target = self.machine.pending().map(|r| r.target.clone());
        let Some(transition) = self.machine.force_idle() else {
            return false;
        };

        log_pipe!();
        log_warning!(
            "Transition stuck in {} for {}ms, forcing Idle",
            phase,
            elapsed.as_millis()
        );
        if let Some(target) = &target {
            log_indented!("Abandoned navigation to '{}'", target);
        }

        self.emit(SequencerEvent::Stalled {
            phase,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
        self.record_transition_with_target(transition, target);
        true
    }

    // # Observers

    /// Register a listener for every [`SequencerEvent`].
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SequencerEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // # Internals

    fn ignore_completion(&mut self) -> CompletionOutcome {
        let phase = self.phase();
        log_debug!("Animation completion ignored while {}", phase);
        self.emit(SequencerEvent::CompletionIgnored { phase });
        CompletionOutcome::Ignored
    }

    fn record_transition(&mut self, transition: Transition) {
        let target = self.machine.pending().map(|r| r.target.clone());
        self.record_transition_with_target(transition, target);
    }

    fn record_transition_with_target(&mut self, transition: Transition, target: Option<String>) {
        self.phase_started_at = self.clock.now();
        log_debug!(
            "{} {} → {}",
            transition.to.symbol(),
            transition.from,
            transition.to
        );
        self.emit(SequencerEvent::phase_changed(
            transition.from,
            transition.to,
            target,
            self.machine.direction(),
        ));
    }

    fn emit(&mut self, event: SequencerEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

/// Convert a configured timeout in seconds to the watchdog setting. Zero disables it.
pub fn stall_timeout_from_secs(seconds: f64) -> Option<StdDuration> {
    (seconds > 0.0 && seconds.is_finite()).then(|| StdDuration::from_secs_f64(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::{HistoryRouter, MockRouter};
    use crate::time_source::SimulatedTimeSource;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<R: Router>(sequencer: &mut Sequencer<R>) -> Rc<RefCell<Vec<SequencerEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        sequencer.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_scenario_home_then_other() {
        let mut router = MockRouter::new();
        router
            .expect_navigate()
            .withf(|target| target == "home")
            .times(1)
            .return_const(());
        let mut sequencer = Sequencer::new(router);

        let outcome = sequencer.request_navigation("home", Direction::Forward);
        assert_eq!(outcome, RequestOutcome::Accepted(Direction::Forward));
        assert_eq!(sequencer.phase(), Phase::Exiting);
        let pose = sequencer.get_render_descriptor();
        assert_eq!(pose.offset_sign(), -1);
        assert_eq!(pose.opacity, 0.0);

        let outcome = sequencer.request_navigation("other", Direction::Backward);
        assert_eq!(
            outcome,
            RequestOutcome::Dropped(DropReason::Busy(Phase::Exiting))
        );
        assert_eq!(sequencer.pending().map(|r| r.target.as_str()), Some("home"));

        assert_eq!(
            sequencer.notify_animation_complete(),
            CompletionOutcome::Navigated("home".to_string())
        );
        assert_eq!(sequencer.phase(), Phase::Entering);

        assert_eq!(
            sequencer.notify_animation_complete(),
            CompletionOutcome::Settled
        );
        assert_eq!(sequencer.phase(), Phase::Idle);
        assert_eq!(sequencer.pending(), None);
        assert_eq!(sequencer.location(), Some("home"));
    }

    #[test]
    fn test_empty_target_is_dropped() {
        let mut sequencer = Sequencer::new(HistoryRouter::default());
        assert_eq!(
            sequencer.request_navigation("", Direction::Forward),
            RequestOutcome::Dropped(DropReason::EmptyTarget)
        );
        assert!(!sequencer.is_busy());
    }

    #[test]
    fn test_same_target_is_skipped_when_enabled() {
        let mut sequencer =
            Sequencer::new(HistoryRouter::starting_at("home")).with_initial_location("home");
        assert_eq!(
            sequencer.navigate_to("home"),
            RequestOutcome::Dropped(DropReason::AlreadyThere)
        );

        let mut sequencer = Sequencer::new(HistoryRouter::starting_at("home"))
            .with_initial_location("home")
            .with_skip_same_target(false);
        assert!(sequencer.navigate_to("home").is_accepted());
    }

    #[test]
    fn test_navigate_to_infers_direction() {
        let mut sequencer =
            Sequencer::new(HistoryRouter::starting_at("login")).with_initial_location("login");

        assert_eq!(
            sequencer.navigate_to("welcome"),
            RequestOutcome::Accepted(Direction::Backward)
        );
        assert_eq!(sequencer.get_render_descriptor().offset_sign(), 1);
        sequencer.notify_animation_complete();
        sequencer.notify_animation_complete();

        assert_eq!(
            sequencer.navigate_to("signup"),
            RequestOutcome::Accepted(Direction::Forward)
        );
    }

    #[test]
    fn test_current_leg_per_phase() {
        let mut sequencer = Sequencer::new(HistoryRouter::default());
        assert_eq!(sequencer.current_leg(), None);

        sequencer.request_navigation("signup", Direction::Forward);
        let (from, to) = sequencer.current_leg().unwrap();
        assert!(from.is_at_rest());
        assert_eq!(to.offset_sign(), -1);

        sequencer.notify_animation_complete();
        let (from, to) = sequencer.current_leg().unwrap();
        assert_eq!(from.offset_sign(), 1);
        assert!(to.is_at_rest());
    }

    #[test]
    fn test_events_follow_transitions() {
        let mut sequencer = Sequencer::new(HistoryRouter::default());
        let events = recorder(&mut sequencer);

        sequencer.request_navigation("signup", Direction::Forward);
        sequencer.request_navigation("login", Direction::Forward);
        sequencer.notify_animation_complete();
        sequencer.notify_animation_complete();
        sequencer.notify_animation_complete();

        let events = events.borrow();
        assert_eq!(
            *events,
            vec![
                SequencerEvent::phase_changed(
                    Phase::Idle,
                    Phase::Exiting,
                    Some("signup".to_string()),
                    Direction::Forward
                ),
                SequencerEvent::request_dropped("login", DropReason::Busy(Phase::Exiting)),
                SequencerEvent::navigated("signup"),
                SequencerEvent::phase_changed(
                    Phase::Exiting,
                    Phase::Entering,
                    Some("signup".to_string()),
                    Direction::Forward
                ),
                SequencerEvent::phase_changed(
                    Phase::Entering,
                    Phase::Idle,
                    Some("signup".to_string()),
                    Direction::Forward
                ),
                SequencerEvent::CompletionIgnored { phase: Phase::Idle },
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut sequencer = Sequencer::new(HistoryRouter::default());
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = sequencer.subscribe(move |_| *sink.borrow_mut() += 1);

        sequencer.request_navigation("signup", Direction::Forward);
        assert!(sequencer.unsubscribe(id));
        assert!(!sequencer.unsubscribe(id));
        sequencer.notify_animation_complete();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_watchdog_disabled_by_default() {
        let clock = Arc::new(SimulatedTimeSource::from_midnight());
        let mut sequencer =
            Sequencer::new(HistoryRouter::default()).with_time_source(clock.clone());

        sequencer.request_navigation("signup", Direction::Forward);
        clock.advance(StdDuration::from_secs(3600));
        assert!(!sequencer.check_stalled());
        assert_eq!(sequencer.phase(), Phase::Exiting);
    }

    #[test]
    fn test_watchdog_resets_stuck_exit_without_navigating() {
        let clock = Arc::new(SimulatedTimeSource::from_midnight());
        let mut router = MockRouter::new();
        router.expect_navigate().never();
        let mut sequencer = Sequencer::new(router)
            .with_time_source(clock.clone())
            .with_stall_timeout(Some(StdDuration::from_secs(1)));
        let events = recorder(&mut sequencer);

        sequencer.request_navigation("signup", Direction::Forward);
        clock.advance(StdDuration::from_millis(900));
        assert!(!sequencer.check_stalled());

        clock.advance(StdDuration::from_millis(200));
        assert!(sequencer.check_stalled());
        assert_eq!(sequencer.phase(), Phase::Idle);
        assert_eq!(sequencer.pending(), None);
        assert!(events.borrow().contains(&SequencerEvent::Stalled {
            phase: Phase::Exiting,
            elapsed_ms: 1100,
        }));

        // Accepts new work afterwards
        assert!(
            sequencer
                .request_navigation("login", Direction::Forward)
                .is_accepted()
        );
    }

    #[test]
    fn test_watchdog_timer_restarts_each_phase() {
        let clock = Arc::new(SimulatedTimeSource::from_midnight());
        let mut sequencer = Sequencer::new(HistoryRouter::default())
            .with_time_source(clock.clone())
            .with_stall_timeout(Some(StdDuration::from_secs(1)));

        sequencer.request_navigation("signup", Direction::Forward);
        clock.advance(StdDuration::from_millis(800));
        sequencer.notify_animation_complete();
        clock.advance(StdDuration::from_millis(800));
        assert!(!sequencer.check_stalled());
        assert_eq!(sequencer.phase(), Phase::Entering);
    }

    #[test]
    fn test_stall_timeout_from_secs() {
        assert_eq!(stall_timeout_from_secs(0.0), None);
        assert_eq!(stall_timeout_from_secs(-1.0), None);
        assert_eq!(
            stall_timeout_from_secs(2.5),
            Some(StdDuration::from_millis(2500))
        );
    }
}
