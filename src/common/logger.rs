//! Structured logging system with visual formatting.
//!
//! Output is grouped into blocks drawn with Unicode box characters so that a
//! simulated navigation reads as a timeline: each transition opens a block,
//! details hang off it, and the run closes with a terminal marker.
//!
//! The logger supports runtime enable/disable for quiet operation during tests,
//! a separate debug switch for `log_debug!`, and routing to a file through a
//! background writer thread.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

// Channel for routing output to file when --log is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Shape of a single emitted line.
///
/// ## Logging Conventions
///
/// - **`Block`** (`log_block_start!`): opens a new conceptual block such as a
///   phase change or a loaded configuration. Prints an empty pipe `┃` for
///   spacing, then `┣ message`.
/// - **`Decorated`** (`log_decorated!`): a line that belongs to the current block.
/// - **`Indented`** (`log_indented!`): nested details under a decorated line,
///   printed as `┃   message`.
/// - **`Pipe`** (`log_pipe!`): a lone `┃` for spacing before a levelled message.
///   Not for use at the end of a block.
/// - **`Level`** (`log_info!`, `log_warning!`, ...): semantic messages with a
///   coloured `[LEVEL]` tag.
/// - **`Exit`** (`log_error_exit!`): an error that terminates the flow, drawn
///   with the closing corner `┗`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    Block,
    Decorated,
    Indented,
    Pipe,
    Level(Level),
    Exit,
}

/// Severity tag for levelled lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Level {
    Info,
    Debug,
    Warning,
    Error,
    Critical,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "\x1b[32mINFO\x1b[0m",
            Level::Debug => "\x1b[32mDEBUG\x1b[0m",
            Level::Warning => "\x1b[33mWARNING\x1b[0m",
            Level::Error => "\x1b[31mERROR\x1b[0m",
            Level::Critical => "\x1b[31mCRITICAL\x1b[0m",
        }
    }
}

/// Main logging interface.
pub struct Log;

impl Log {
    /// Enable or disable logging temporarily.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output (the `--debug` flag).
    pub fn set_debug_enabled(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if debug output is enabled.
    pub fn is_debug_enabled() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Start file logging to the specified path.
    ///
    /// Output is written by a background thread until the returned guard drops.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix shown while a simulated time source drives the clock.
    ///
    /// Returns an empty string outside of simulation.
    pub fn get_timestamp_prefix() -> String {
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%H:%M:%S%.3f"))
        } else {
            String::new()
        }
    }
}

/// Guard for file logging that ensures clean shutdown.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        // LOG_CHANNEL stays set: OnceLock cannot be cleared and the process exits after logging.
    }
}

/// Remove ANSI colour sequences (`ESC [ ... m`) so file output stays clean.
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Build the full text for one line, including the timestamp prefix.
pub fn format_line(kind: LineKind, prefix: &str, message: &str) -> String {
    match kind {
        LineKind::Block => format!("{prefix}┃\n{prefix}┣ {message}\n"),
        LineKind::Decorated => format!("{prefix}┣ {message}\n"),
        LineKind::Indented => format!("{prefix}┃   {message}\n"),
        LineKind::Pipe => format!("{prefix}┃\n"),
        LineKind::Level(level) => format!("{prefix}┣[{}] {message}\n", level.tag()),
        LineKind::Exit => format!(
            "{prefix}┃\n{prefix}┗[{}] {message}\n",
            Level::Error.tag()
        ),
    }
}

/// Format and route one line. Called by the logging macros.
pub fn emit(kind: LineKind, message: &str) {
    if !Log::is_enabled() {
        return;
    }
    if kind == LineKind::Level(Level::Debug) && !Log::is_debug_enabled() {
        return;
    }
    let prefix = Log::get_timestamp_prefix();
    write_output(&format_line(kind, &prefix, message));
}

/// Route already formatted text to the log file or stdout.
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

// # Logging Macros

#[doc(hidden)]
#[macro_export]
macro_rules! __log_emit {
    ($kind:expr, $fmt:literal $($arg:tt)*) => {{
        if $crate::common::logger::Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::emit($kind, &message);
        }
    }};
    ($kind:expr, $expr:expr) => {{
        if $crate::common::logger::Log::is_enabled() {
            let message = format!("{}", $expr);
            $crate::common::logger::emit($kind, &message);
        }
    }};
}

/// Log a decorated message as part of the current block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::__log_emit!($crate::common::logger::LineKind::Decorated, $($arg)+)
    };
}

/// Log an indented message for details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::__log_emit!($crate::common::logger::LineKind::Indented, $($arg)+)
    };
}

/// Log a block start message, initiating a new conceptual block.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {
        $crate::__log_emit!($crate::common::logger::LineKind::Block, $($arg)+)
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::common::logger::emit($crate::common::logger::LineKind::Pipe, "")
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        if $crate::common::logger::Log::is_enabled() {
            let prefix = $crate::common::logger::Log::get_timestamp_prefix();
            let version = env!("CARGO_PKG_VERSION");
            $crate::common::logger::write_output(&format!("{prefix}┏ slidenav v{version} ━━╸\n"));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        if $crate::common::logger::Log::is_enabled() {
            let prefix = $crate::common::logger::Log::get_timestamp_prefix();
            $crate::common::logger::write_output(&format!("{prefix}╹\n"));
        }
    }};
}

/// Log an informational message with a green tag.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_emit!(
            $crate::common::logger::LineKind::Level($crate::common::logger::Level::Info),
            $($arg)+
        )
    };
}

/// Log a debug message. Only printed when debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        if $crate::common::logger::Log::is_debug_enabled() {
            $crate::__log_emit!(
                $crate::common::logger::LineKind::Level($crate::common::logger::Level::Debug),
                $($arg)+
            )
        }
    };
}

/// Log a warning message with a yellow tag.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_emit!(
            $crate::common::logger::LineKind::Level($crate::common::logger::Level::Warning),
            $($arg)+
        )
    };
}

/// Log an error message with a red tag.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::__log_emit!(
            $crate::common::logger::LineKind::Level($crate::common::logger::Level::Error),
            $($arg)+
        )
    };
}

/// Log a critical message with a red tag.
#[macro_export]
macro_rules! log_critical {
    ($($arg:tt)+) => {
        $crate::__log_emit!(
            $crate::common::logger::LineKind::Level($crate::common::logger::Level::Critical),
            $($arg)+
        )
    };
}

/// Log an error that terminates the current flow.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => {
        $crate::__log_emit!($crate::common::logger::LineKind::Exit, $($arg)+)
    };
}
