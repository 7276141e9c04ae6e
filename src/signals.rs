//! Shutdown signal handling for the simulation CLI.
//!
//! A background thread waits for SIGINT, SIGTERM or SIGHUP and raises a shared
//! flag. Real-time simulations poll the flag once per frame and stop cleanly,
//! so the final report and the log file are still written.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

/// Signal handling state shared with the simulation loop
#[derive(Debug, Clone)]
pub struct SignalState {
    /// Set once a shutdown signal arrived
    pub interrupted: Arc<AtomicBool>,
}

impl SignalState {
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

/// Register the shutdown signals and spawn the thread that watches them.
pub fn setup_signal_handler() -> Result<SignalState> {
    let interrupted = Arc::new(AtomicBool::new(false));

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;

    let interrupted_clone = Arc::clone(&interrupted);
    thread::spawn(move || {
        for sig in signals.forever() {
            let name = match sig {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                SIGHUP => "SIGHUP",
                _ => "signal",
            };
            log_debug!("Received {}, stopping simulation", name);

            // A second signal while already stopping exits immediately
            if interrupted_clone.swap(true, Ordering::SeqCst) {
                std::process::exit(crate::common::constants::EXIT_FAILURE);
            }
        }
    });

    Ok(SignalState { interrupted })
}
