use proptest::prelude::*;
use slidenav::core::descriptor::{animate_to, describe};
use slidenav::{
    CompletionOutcome, Direction, DropReason, MotionProfile, Phase, RequestOutcome, Sequencer,
    SequencerEvent,
};
use std::cell::RefCell;
use std::rc::Rc;

const TARGETS: [&str; 4] = ["welcome", "signup", "login", "/books/7"];

#[derive(Debug, Clone)]
enum Op {
    Request(usize, Direction),
    Complete,
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
}

fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Idle),
        Just(Phase::Exiting),
        Just(Phase::Entering)
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..TARGETS.len(), direction_strategy()).prop_map(|(t, d)| Op::Request(t, d)),
        Just(Op::Complete),
    ]
}

fn profile_strategy() -> impl Strategy<Value = MotionProfile> {
    (0.0f32..=2000.0, 0.5f32..=1.0, 0.0f64..=10.0, 0.0f64..=10.0).prop_map(
        |(slide_distance, exit_scale, exit_duration, enter_duration)| MotionProfile {
            slide_distance,
            exit_scale,
            exit_duration,
            enter_duration,
            ..MotionProfile::default()
        },
    )
}

/// Sequencer wired to a closure router that records every navigation.
fn recording_sequencer() -> (
    Sequencer<impl FnMut(&str)>,
    Rc<RefCell<Vec<String>>>,
    Rc<RefCell<Vec<SequencerEvent>>>,
) {
    let navigations = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&navigations);
    let router = move |target: &str| sink.borrow_mut().push(target.to_string());

    let mut sequencer = Sequencer::new(router).with_skip_same_target(false);
    let events = Rc::new(RefCell::new(Vec::new()));
    let event_sink = Rc::clone(&events);
    sequencer.subscribe(move |event| event_sink.borrow_mut().push(event.clone()));

    (sequencer, navigations, events)
}

proptest! {
    /// Requests made while a transition is in flight change nothing
    #[test]
    fn test_single_flight(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let (mut sequencer, navigations, _) = recording_sequencer();

        for op in ops {
            match op {
                Op::Request(index, direction) => {
                    let was_busy = sequencer.is_busy();
                    let pending_before = sequencer.pending().cloned();
                    let phase_before = sequencer.phase();
                    let navigations_before = navigations.borrow().len();

                    let outcome = sequencer.request_navigation(TARGETS[index], direction);

                    if was_busy {
                        prop_assert_eq!(outcome, RequestOutcome::Dropped(DropReason::Busy(phase_before)));
                        prop_assert_eq!(sequencer.pending().cloned(), pending_before);
                        prop_assert_eq!(sequencer.phase(), phase_before);
                    } else {
                        prop_assert_eq!(outcome, RequestOutcome::Accepted(direction));
                        prop_assert_eq!(sequencer.phase(), Phase::Exiting);
                    }
                    prop_assert_eq!(navigations.borrow().len(), navigations_before);
                }
                Op::Complete => {
                    sequencer.notify_animation_complete();
                }
            }
        }
    }

    /// Every observed transition follows Idle → Exiting → Entering → Idle
    #[test]
    fn test_strict_phase_ordering(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let (mut sequencer, _, events) = recording_sequencer();

        for op in ops {
            match op {
                Op::Request(index, direction) => {
                    sequencer.request_navigation(TARGETS[index], direction);
                }
                Op::Complete => {
                    sequencer.notify_animation_complete();
                }
            }
        }

        let mut expected_from = Phase::Idle;
        for event in events.borrow().iter() {
            if let SequencerEvent::PhaseChanged { from, to, .. } = event {
                prop_assert_eq!(*from, expected_from);
                prop_assert_eq!(*to, from.next_phase());
                expected_from = *to;
            }
        }
        prop_assert_eq!(expected_from, sequencer.phase());
    }

    /// The router is called exactly once per accepted request, on Exiting → Entering
    #[test]
    fn test_navigate_once_per_request(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let (mut sequencer, navigations, _) = recording_sequencer();
        let mut accepted: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Request(index, direction) => {
                    if sequencer.request_navigation(TARGETS[index], direction).is_accepted() {
                        accepted.push(TARGETS[index].to_string());
                    }
                }
                Op::Complete => {
                    let phase_before = sequencer.phase();
                    let navigations_before = navigations.borrow().len();
                    let outcome = sequencer.notify_animation_complete();
                    let navigated = navigations.borrow().len() - navigations_before;

                    match phase_before {
                        Phase::Exiting => {
                            prop_assert_eq!(navigated, 1);
                            let expected = accepted.last().cloned().unwrap_or_default();
                            prop_assert_eq!(navigations.borrow().last().cloned(), Some(expected.clone()));
                            prop_assert_eq!(outcome, CompletionOutcome::Navigated(expected));
                        }
                        Phase::Entering => {
                            prop_assert_eq!(navigated, 0);
                            prop_assert_eq!(outcome, CompletionOutcome::Settled);
                        }
                        Phase::Idle => {
                            prop_assert_eq!(navigated, 0);
                            prop_assert_eq!(outcome, CompletionOutcome::Ignored);
                        }
                    }
                }
            }
        }

        // A request still exiting has not navigated yet
        let in_exit = usize::from(sequencer.phase() == Phase::Exiting);
        prop_assert_eq!(navigations.borrow().len() + in_exit, accepted.len());
    }

    /// Descriptor reads are pure
    #[test]
    fn test_descriptor_determinism(
        phase in phase_strategy(),
        direction in direction_strategy(),
        profile in profile_strategy()
    ) {
        prop_assert_eq!(describe(phase, direction, &profile), describe(phase, direction, &profile));
        prop_assert_eq!(animate_to(phase, direction, &profile), animate_to(phase, direction, &profile));
    }

    /// Forward and backward poses mirror each other horizontally
    #[test]
    fn test_direction_mirroring(
        phase in phase_strategy(),
        profile in profile_strategy()
    ) {
        let forward = describe(phase, Direction::Forward, &profile);
        let backward = describe(phase, Direction::Backward, &profile);

        prop_assert_eq!(forward.offset_x, -backward.offset_x);
        prop_assert_eq!(forward.opacity, backward.opacity);
        prop_assert_eq!(forward.scale, backward.scale);
        prop_assert_eq!(forward.timing, backward.timing);

        match phase {
            Phase::Idle => prop_assert_eq!(forward.offset_x, 0.0),
            Phase::Exiting => prop_assert_eq!(forward.offset_x, -profile.slide_distance),
            Phase::Entering => prop_assert_eq!(forward.offset_x, profile.slide_distance),
        }
    }

    /// Rendering reads never move the sequencer
    #[test]
    fn test_render_reads_are_idempotent(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let (mut sequencer, _, _) = recording_sequencer();
        for op in ops {
            match op {
                Op::Request(index, direction) => {
                    sequencer.request_navigation(TARGETS[index], direction);
                }
                Op::Complete => {
                    sequencer.notify_animation_complete();
                }
            }
            let phase = sequencer.phase();
            let first = sequencer.get_render_descriptor();
            prop_assert_eq!(sequencer.get_render_descriptor(), first);
            prop_assert_eq!(sequencer.phase(), phase);
        }
    }
}
