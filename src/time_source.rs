//! Time source abstraction for supporting both real-time and simulated time.
//!
//! The sequencer's stall watchdog and the animation playback both measure elapsed
//! time through a [`TimeSource`]. Production code uses [`RealTimeSource`]; tests and
//! the `simulate` command use [`SimulatedTimeSource`], whose `sleep` advances the
//! clock instantly so a whole navigation script runs in a few milliseconds.
//!
//! A process-global source exists only so the logger can prefix simulated
//! timestamps. Components that need time receive a source by injection.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration as StdDuration;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;
}

/// Real-time implementation that uses actual system time
#[derive(Debug, Default)]
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Fast-forward clock: `sleep` moves simulated time forward without blocking.
#[derive(Debug)]
pub struct SimulatedTimeSource {
    current: Mutex<DateTime<Local>>,
}

impl SimulatedTimeSource {
    /// Create a simulated clock starting at `start_time`.
    pub fn new(start_time: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(start_time),
        }
    }

    /// Create a simulated clock starting at midnight today, so log timestamps
    /// read as time elapsed since the simulation began.
    pub fn from_midnight() -> Self {
        let today = Local::now().date_naive().and_time(NaiveTime::MIN);
        let start = Local
            .from_local_datetime(&today)
            .earliest()
            .unwrap_or_else(Local::now);
        Self::new(start)
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: StdDuration) {
        let step = ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::MAX);
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = guard.checked_add_signed(step).unwrap_or(*guard);
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sleep(&self, duration: StdDuration) {
        self.advance(duration);
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Time elapsed between `since` and the source's current time.
///
/// Returns zero if the clock reads earlier than `since`.
pub fn elapsed_since(source: &dyn TimeSource, since: DateTime<Local>) -> StdDuration {
    source
        .now()
        .signed_duration_since(since)
        .to_std()
        .unwrap_or(StdDuration::ZERO)
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the global time source, falling back to real time
pub fn global() -> Arc<dyn TimeSource> {
    Arc::clone(TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)))
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}
