//! Scripted simulation of an animation runtime driving a [`Sequencer`].
//!
//! A script is a list of clicks, each naming a target screen and the moment it
//! happens (`signup@300` clicks "signup" 300ms after the start). Every frame the
//! simulation:
//!
//! 1. fires the clicks that are due through [`Sequencer::navigate_to`]
//! 2. starts a [`Playback`] for the sequencer's current leg when none is playing
//! 3. samples the pose and reports completion once the leg finishes
//! 4. runs the stall watchdog
//!
//! The run ends when every click has fired and the sequencer is idle again, when
//! the maximum duration has elapsed or when the interrupt flag is raised.
//!
//! Time comes from a [`TimeSource`]. With a [`SimulatedTimeSource`](crate::time_source::SimulatedTimeSource)
//! each frame's sleep only advances the clock, so a full run is instant and
//! deterministic.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration as StdDuration;

use crate::common::constants::*;
use crate::core::descriptor::AnimationStateDescriptor;
use crate::core::phase::Phase;
use crate::core::playback::Playback;
use crate::core::router::Router;
use crate::core::sequencer::Sequencer;
use crate::events::SequencerEvent;
use crate::time_source::{TimeSource, elapsed_since};

/// One scripted click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub target: String,
    /// Offset from the start of the simulation.
    pub at: StdDuration,
}

impl ScriptStep {
    pub fn new(target: impl Into<String>, at: StdDuration) -> Self {
        Self {
            target: target.into(),
            at,
        }
    }

    /// Parse `target` or `target@milliseconds`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let (target, at) = match input.rsplit_once('@') {
            Some((target, millis)) => {
                let millis = millis
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid click time '{millis}' in '{input}'"))?;
                (target.trim(), StdDuration::from_millis(millis))
            }
            None => (input.trim(), StdDuration::ZERO),
        };

        if target.is_empty() {
            return Err(format!("Missing target screen in '{input}'"));
        }

        Ok(Self::new(target, at))
    }
}

impl FromStr for ScriptStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.target, self.at.as_millis())
    }
}

/// Event stamped with the simulated time it happened at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: SequencerEvent,
}

/// State handed to the frame observer once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub elapsed: StdDuration,
    pub phase: Phase,
    pub pose: AnimationStateDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEnd {
    /// Every click fired and the sequencer settled.
    Completed,
    Interrupted,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub end: SimulationEnd,
    pub frames: u64,
    pub elapsed_ms: u64,
    /// Targets passed to the router, in order.
    pub navigations: Vec<String>,
    pub dropped: usize,
    pub final_location: Option<String>,
    pub events: Vec<TimedEvent>,
}

type FrameObserver = Box<dyn FnMut(&Frame)>;

pub struct Simulation<R: Router> {
    sequencer: Sequencer<R>,
    steps: Vec<ScriptStep>,
    frame_interval: StdDuration,
    max_duration: StdDuration,
    interrupt: Option<Arc<AtomicBool>>,
    on_frame: Option<FrameObserver>,
}

impl<R: Router> Simulation<R> {
    pub fn new(sequencer: Sequencer<R>, mut steps: Vec<ScriptStep>) -> Self {
        // Stable sort keeps the given order for clicks at the same moment
        steps.sort_by_key(|step| step.at);
        Self {
            sequencer,
            steps,
            frame_interval: StdDuration::from_millis(DEFAULT_FRAME_INTERVAL),
            max_duration: StdDuration::from_secs_f64(MAXIMUM_SIMULATION_SECONDS),
            interrupt: None,
            on_frame: None,
        }
    }

    pub fn with_frame_interval(mut self, interval: StdDuration) -> Self {
        self.frame_interval = interval.max(StdDuration::from_millis(MINIMUM_FRAME_INTERVAL));
        self
    }

    pub fn with_max_duration(mut self, max_duration: StdDuration) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Stop at the next frame once `flag` is set.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn with_frame_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&Frame) + 'static,
    {
        self.on_frame = Some(Box::new(observer));
        self
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub fn sequencer(&self) -> &Sequencer<R> {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer<R> {
        &mut self.sequencer
    }

    pub fn into_sequencer(self) -> Sequencer<R> {
        self.sequencer
    }

    /// Run the script to completion on `clock`.
    pub fn run(&mut self, clock: Arc<dyn TimeSource>) -> SimulationReport {
        let start = clock.now();
        self.sequencer.set_time_source(Arc::clone(&clock));

        let recorded = Rc::new(RefCell::new(Vec::new()));
        let subscription = {
            let sink = Rc::clone(&recorded);
            let clock = Arc::clone(&clock);
            self.sequencer.subscribe(move |event| {
                let at = elapsed_since(clock.as_ref(), start);
                sink.borrow_mut().push(TimedEvent {
                    at_ms: millis(at),
                    event: event.clone(),
                });
            })
        };

        log_debug!(
            "Simulation started: {} clicks, {}ms frames",
            self.steps.len(),
            self.frame_interval.as_millis()
        );

        let mut pending: VecDeque<ScriptStep> = self.steps.iter().cloned().collect();
        let mut playing: Option<(Phase, Playback)> = None;
        let mut frames = 0u64;

        let end = loop {
            if self
                .interrupt
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
            {
                break SimulationEnd::Interrupted;
            }

            let elapsed = elapsed_since(clock.as_ref(), start);

            while let Some(step) = pending.front()
                && step.at <= elapsed
            {
                if let Some(step) = pending.pop_front() {
                    log_debug!("Click on '{}' at {}ms", step.target, millis(elapsed));
                    self.sequencer.navigate_to(step.target);
                }
            }

            // Drop a leg the sequencer has moved past (watchdog reset)
            if playing
                .as_ref()
                .is_some_and(|(phase, _)| *phase != self.sequencer.phase())
            {
                playing = None;
            }
            if playing.is_none() {
                playing = self.start_leg(clock.as_ref());
            }

            let pose = match &playing {
                Some((_, leg)) => leg.sample(clock.as_ref()),
                None => self.sequencer.get_render_descriptor(),
            };
            if let Some(observer) = self.on_frame.as_mut() {
                observer(&Frame {
                    index: frames,
                    elapsed,
                    phase: self.sequencer.phase(),
                    pose,
                });
            }

            if playing
                .as_ref()
                .is_some_and(|(_, leg)| leg.is_finished(clock.as_ref()))
            {
                self.sequencer.notify_animation_complete();
                playing = self.start_leg(clock.as_ref());
            }

            if self.sequencer.check_stalled() {
                playing = None;
            }

            frames += 1;

            if pending.is_empty() && !self.sequencer.is_busy() {
                break SimulationEnd::Completed;
            }
            if elapsed >= self.max_duration {
                log_warning!(
                    "Simulation stopped after {}s without settling",
                    self.max_duration.as_secs_f64()
                );
                break SimulationEnd::TimedOut;
            }

            clock.sleep(self.frame_interval);
        };

        self.sequencer.unsubscribe(subscription);
        let events = recorded.take();

        let navigations = events
            .iter()
            .filter_map(|timed| match &timed.event {
                SequencerEvent::Navigated { target } => Some(target.clone()),
                _ => None,
            })
            .collect();
        let dropped = events
            .iter()
            .filter(|timed| matches!(timed.event, SequencerEvent::RequestDropped { .. }))
            .count();

        let report = SimulationReport {
            end,
            frames,
            elapsed_ms: millis(elapsed_since(clock.as_ref(), start)),
            navigations,
            dropped,
            final_location: self.sequencer.location().map(str::to_string),
            events,
        };
        log_debug!(
            "Simulation ended ({:?}) after {} frames",
            report.end,
            report.frames
        );
        report
    }

    fn start_leg(&self, clock: &dyn TimeSource) -> Option<(Phase, Playback)> {
        self.sequencer
            .current_leg()
            .map(|(from, to)| (self.sequencer.phase(), Playback::start(from, to, clock.now())))
    }
}

fn millis(duration: StdDuration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::HistoryRouter;
    use crate::events::DropReason;
    use crate::time_source::SimulatedTimeSource;

    fn simulated() -> Arc<SimulatedTimeSource> {
        Arc::new(SimulatedTimeSource::from_midnight())
    }

    fn steps(script: &[&str]) -> Vec<ScriptStep> {
        script.iter().map(|s| ScriptStep::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_parse_script_step() {
        assert_eq!(
            ScriptStep::parse("signup@300").unwrap(),
            ScriptStep::new("signup", StdDuration::from_millis(300))
        );
        assert_eq!(
            ScriptStep::parse("login").unwrap(),
            ScriptStep::new("login", StdDuration::ZERO)
        );
        assert_eq!(
            "/books/7@50".parse::<ScriptStep>().unwrap(),
            ScriptStep::new("/books/7", StdDuration::from_millis(50))
        );
        assert_eq!(
            ScriptStep::parse("a@b@10").unwrap().target,
            "a@b".to_string()
        );
    }

    #[test]
    fn test_parse_script_step_errors() {
        assert!(ScriptStep::parse("").is_err());
        assert!(ScriptStep::parse("@100").is_err());
        assert!(
            ScriptStep::parse("signup@soon")
                .unwrap_err()
                .contains("Invalid click time")
        );
        assert!(ScriptStep::parse("signup@-5").is_err());
    }

    #[test]
    fn test_steps_are_sorted_by_time() {
        let sequencer = Sequencer::new(HistoryRouter::default());
        let simulation = Simulation::new(sequencer, steps(&["login@500", "signup@100", "x@100"]));
        let order: Vec<&str> = simulation
            .steps()
            .iter()
            .map(|s| s.target.as_str())
            .collect();
        assert_eq!(order, ["signup", "x", "login"]);
    }

    #[test]
    fn test_single_click_completes() {
        let sequencer =
            Sequencer::new(HistoryRouter::starting_at("welcome")).with_initial_location("welcome");
        let mut simulation = Simulation::new(sequencer, steps(&["signup"]));
        let report = simulation.run(simulated());

        assert_eq!(report.end, SimulationEnd::Completed);
        assert_eq!(report.navigations, ["signup"]);
        assert_eq!(report.final_location.as_deref(), Some("signup"));
        assert_eq!(simulation.sequencer().router().current(), Some("signup"));
        assert_eq!(simulation.sequencer().phase(), Phase::Idle);

        // Exit then enter at 16ms frames
        assert!(report.elapsed_ms >= 640);
        assert!(report.elapsed_ms < 640 + 3 * 16);
    }

    #[test]
    fn test_click_during_transition_is_dropped() {
        let sequencer =
            Sequencer::new(HistoryRouter::starting_at("welcome")).with_initial_location("welcome");
        let mut simulation = Simulation::new(sequencer, steps(&["signup@0", "login@100"]));
        let report = simulation.run(simulated());

        assert_eq!(report.navigations, ["signup"]);
        assert_eq!(report.dropped, 1);
        assert!(report.events.iter().any(|timed| timed.event
            == SequencerEvent::request_dropped("login", DropReason::Busy(Phase::Exiting))));
    }

    #[test]
    fn test_clicks_after_settling_are_accepted() {
        let sequencer =
            Sequencer::new(HistoryRouter::starting_at("welcome")).with_initial_location("welcome");
        let mut simulation =
            Simulation::new(sequencer, steps(&["signup@0", "login@1000", "welcome@2000"]));
        let report = simulation.run(simulated());

        assert_eq!(report.navigations, ["signup", "login", "welcome"]);
        assert_eq!(report.dropped, 0);
        assert_eq!(
            simulation.sequencer().router().history(),
            ["welcome", "signup", "login", "welcome"]
        );
    }

    #[test]
    fn test_events_are_timestamped_in_order() {
        let sequencer = Sequencer::new(HistoryRouter::default());
        let mut simulation = Simulation::new(sequencer, steps(&["signup@200"]));
        let report = simulation.run(simulated());

        let stamps: Vec<u64> = report.events.iter().map(|e| e.at_ms).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert!(stamps[0] >= 200);

        let navigated = report
            .events
            .iter()
            .find(|e| matches!(e.event, SequencerEvent::Navigated { .. }))
            .unwrap();
        assert!(navigated.at_ms >= 200 + 280);
    }

    #[test]
    fn test_frame_observer_sees_exit_then_enter() {
        let sequencer = Sequencer::new(HistoryRouter::default());
        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&phases);
        let mut simulation = Simulation::new(sequencer, steps(&["signup"]))
            .with_frame_observer(move |frame| sink.borrow_mut().push(frame.phase));
        let report = simulation.run(simulated());

        let phases = phases.borrow();
        assert_eq!(phases.len() as u64, report.frames);
        let first_entering = phases.iter().position(|p| *p == Phase::Entering).unwrap();
        assert!(phases[..first_entering].iter().all(|p| *p == Phase::Exiting));
    }

    #[test]
    fn test_interrupt_stops_run() {
        let flag = Arc::new(AtomicBool::new(true));
        let sequencer = Sequencer::new(HistoryRouter::default());
        let mut simulation =
            Simulation::new(sequencer, steps(&["signup"])).with_interrupt(Arc::clone(&flag));
        let report = simulation.run(simulated());

        assert_eq!(report.end, SimulationEnd::Interrupted);
        assert_eq!(report.frames, 0);
        assert!(report.navigations.is_empty());
    }

    #[test]
    fn test_max_duration_times_out() {
        let sequencer = Sequencer::new(HistoryRouter::default());
        let mut simulation = Simulation::new(sequencer, steps(&["signup@5000"]))
            .with_max_duration(StdDuration::from_secs(1));
        let report = simulation.run(simulated());

        assert_eq!(report.end, SimulationEnd::TimedOut);
        assert!(report.navigations.is_empty());
    }

    #[test]
    fn test_report_serializes_flat_events() {
        let sequencer = Sequencer::new(HistoryRouter::default());
        let mut simulation = Simulation::new(sequencer, steps(&["signup"]));
        let report = simulation.run(simulated());

        let json = serde_json::to_string(&report.events[0]).unwrap();
        assert!(json.contains("\"at_ms\":0"));
        assert!(json.contains("\"event_type\":\"phase_changed\""));
    }
}
