//! Implementation of the simulate command.
//!
//! Builds a sequencer from the loaded configuration, feeds it the scripted
//! clicks through a simulated animation runtime and reports what happened.
//! By default time is simulated and the run finishes instantly; `--realtime`
//! sleeps between frames so the timeline can be watched as it unfolds.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::common::logger::Log;
use crate::core::router::HistoryRouter;
use crate::core::sequencer::Sequencer;
use crate::events::SequencerEvent;
use crate::simulate::{ScriptStep, Simulation, SimulationEnd, SimulationReport};
use crate::time_source::{self, RealTimeSource, SimulatedTimeSource, TimeSource};

/// Options collected from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateOptions {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    pub steps: Vec<ScriptStep>,
    pub fps: Option<u32>,
    pub realtime: bool,
    pub json: bool,
    pub log_file: Option<String>,
}

/// Final line of the JSON output.
#[derive(Serialize)]
struct JsonSummary<'a> {
    event_type: &'static str,
    end: SimulationEnd,
    frames: u64,
    elapsed_ms: u64,
    navigations: &'a [String],
    dropped: usize,
    final_location: Option<&'a str>,
}

/// Handle the simulate command.
pub fn handle_simulate_command(options: SimulateOptions) -> Result<()> {
    // JSON goes to stdout on its own
    if options.json {
        Log::set_enabled(false);
    }

    let _log_guard = match &options.log_file {
        Some(path) => Some(Log::start_file_logging(path.clone())?),
        None => None,
    };

    // Initialize the time source BEFORE any logging so timestamps are consistent
    let clock: Arc<dyn TimeSource> = if options.realtime {
        Arc::new(RealTimeSource)
    } else {
        Arc::new(SimulatedTimeSource::from_midnight())
    };
    time_source::init_time_source(Arc::clone(&clock));

    log_version!();
    let config = super::load_config(options.config_dir.clone())?;
    config.log_config();

    let initial = config
        .initial_screen
        .clone()
        .context("No initial screen configured")?;
    let mut sequencer = Sequencer::from_config(HistoryRouter::starting_at(initial.clone()), &config);
    sequencer.subscribe(log_event);

    let frame_interval = match options.fps {
        Some(fps) => StdDuration::from_secs_f64(1.0 / f64::from(fps.max(1))),
        None => config.frame_interval(),
    };

    log_block_start!("Simulating {} clicks from '{}'", options.steps.len(), initial);
    for step in &options.steps {
        log_indented!("{}", step);
    }
    if options.realtime {
        log_indented!("Running in real time, press Ctrl+C to stop");
    }

    let mut simulation =
        Simulation::new(sequencer, options.steps.clone()).with_frame_interval(frame_interval);

    if options.realtime {
        let signals = crate::signals::setup_signal_handler()?;
        simulation = simulation.with_interrupt(signals.interrupted);
    }
    if options.debug_enabled {
        simulation = simulation.with_frame_observer(|frame| {
            if frame.phase.is_busy() {
                log_debug!(
                    "Frame {}: {} opacity {:.2} offset {:+.1} scale {:.3}",
                    frame.index,
                    frame.phase,
                    frame.pose.opacity,
                    frame.pose.offset_x,
                    frame.pose.scale
                );
            }
        });
    }

    let report = simulation.run(clock);

    if options.json {
        print_json(&report)?;
    } else {
        log_report(&report, simulation.sequencer().router());
    }

    log_end!();
    Ok(())
}

fn log_event(event: &SequencerEvent) {
    match event {
        SequencerEvent::PhaseChanged { to, .. } => {
            log_block_start!("{} {}", to.symbol(), event.summary());
        }
        SequencerEvent::Navigated { .. } => log_decorated!("{}", event.summary()),
        SequencerEvent::RequestDropped { .. } => log_indented!("{}", event.summary()),
        SequencerEvent::CompletionIgnored { .. } => log_debug!("{}", event.summary()),
        // The watchdog logs its own warning
        SequencerEvent::Stalled { .. } => {}
    }
}

fn log_report(report: &SimulationReport, router: &HistoryRouter) {
    match report.end {
        SimulationEnd::Completed => log_block_start!("Simulation complete"),
        SimulationEnd::Interrupted => log_block_start!("Simulation interrupted"),
        SimulationEnd::TimedOut => log_block_start!("Simulation timed out"),
    }
    log_indented!(
        "{} frames over {}ms",
        report.frames,
        report.elapsed_ms
    );
    log_indented!(
        "Navigations: {} ({} dropped requests)",
        report.navigations.len(),
        report.dropped
    );
    log_indented!("History: {}", router.history().join(" → "));
    if let Some(location) = &report.final_location {
        log_indented!("Final location: {}", location);
    }
}

fn print_json(report: &SimulationReport) -> Result<()> {
    let mut output = String::new();
    for event in &report.events {
        output.push_str(&serde_json::to_string(event).context("Failed to serialize event")?);
        output.push('\n');
    }

    let summary = JsonSummary {
        event_type: "summary",
        end: report.end,
        frames: report.frames,
        elapsed_ms: report.elapsed_ms,
        navigations: &report.navigations,
        dropped: report.dropped,
        final_location: report.final_location.as_deref(),
    };
    output.push_str(&serde_json::to_string(&summary).context("Failed to serialize summary")?);
    output.push('\n');

    // Stdout even when --log routes the log elsewhere
    print!("{output}");
    Ok(())
}

/// Display help for the simulate command
pub fn display_help() {
    log_version!();
    log_block_start!("simulate - Run scripted clicks through the sequencer");
    log_block_start!("Usage: slidenav simulate <target[@ms]>... [OPTIONS]");
    log_block_start!("Arguments:");
    log_indented!("target[@ms]  Screen to click, optionally delayed by milliseconds");
    log_indented!("             Clicks at the same moment keep their order");
    log_block_start!("Options:");
    log_indented!("-f, --fps <N>      Frames per second (default from frame_interval)");
    log_indented!("-r, --realtime     Sleep between frames instead of fast-forwarding");
    log_indented!("-j, --json         Print events and summary as JSON lines");
    log_indented!("-l, --log <FILE>   Write the log to FILE instead of the terminal");
    log_block_start!("Examples:");
    log_indented!("slidenav simulate signup login@1000");
    log_indented!("slidenav simulate signup@0 login@100 --json");
    log_end!();
}
