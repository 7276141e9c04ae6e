//! Command-line argument parsing and processing.
//!
//! Arguments are parsed by hand into a [`CliAction`]. Global flags (`--debug`,
//! `--config`, `--help`, `--version`) may appear anywhere; everything else
//! belongs to the command.

use crate::simulate::ScriptStep;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run a scripted simulation
    Simulate {
        debug_enabled: bool,
        config_dir: Option<String>,
        steps: Vec<ScriptStep>,
        /// Frames per second, overriding `frame_interval` from the config
        fps: Option<u32>,
        /// Sleep in real time between frames instead of fast-forwarding
        realtime: bool,
        /// Print the report as JSON lines
        json: bool,
        log_file: Option<String>,
    },
    /// Print the pose table
    Poses {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Help command, optionally for one command
    HelpCommand { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

const MAXIMUM_FPS: u32 = 1000;

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Help and version take precedence over everything else
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut command: Option<String> = None;
        let mut positionals: Vec<String> = Vec::new();
        let mut fps: Option<u32> = None;
        let mut realtime = false;
        let mut json = false;
        let mut log_file: Option<String> = None;
        let mut unknown_arg_found = false;

        let mut i = 0;
        while i < args_vec.len() {
            let arg = args_vec[i].as_str();
            match arg {
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => {
                    if let Some(dir) = value_after(&args_vec, i) {
                        config_dir = Some(dir);
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--fps" | "-f" => {
                    match value_after(&args_vec, i).map(|v| v.parse::<u32>()) {
                        Some(Ok(value)) if (1..=MAXIMUM_FPS).contains(&value) => fps = Some(value),
                        Some(_) => {
                            log_warning!(
                                "Invalid frame rate: {}. Use a number between 1 and {}",
                                args_vec[i + 1],
                                MAXIMUM_FPS
                            );
                            unknown_arg_found = true;
                        }
                        None => {
                            log_warning!("Missing value for --fps. Usage: --fps <frames>");
                            unknown_arg_found = true;
                        }
                    }
                    i += 1;
                }
                "--realtime" | "-r" => realtime = true,
                "--json" | "-j" => json = true,
                "--log" | "-l" => {
                    if let Some(file) = value_after(&args_vec, i) {
                        log_file = Some(file);
                        i += 1;
                    } else {
                        log_warning!("Missing file for --log. Usage: --log <file>");
                        unknown_arg_found = true;
                    }
                }
                _ if arg.starts_with('-') => {
                    log_warning!("Unknown option: {}", arg);
                    unknown_arg_found = true;
                }
                _ if command.is_none() => command = Some(arg.to_string()),
                _ => positionals.push(arg.to_string()),
            }
            i += 1;
        }

        if unknown_arg_found {
            return ParsedArgs {
                action: CliAction::ShowHelpDueToError,
            };
        }

        let simulate_only = fps.is_some() || realtime || json || log_file.is_some();

        let action = match command.as_deref() {
            None => CliAction::ShowHelp,
            Some("simulate" | "sim") => {
                match Self::parse_steps(&positionals) {
                    Some(steps) => CliAction::Simulate {
                        debug_enabled,
                        config_dir,
                        steps,
                        fps,
                        realtime,
                        json,
                        log_file,
                    },
                    None => CliAction::ShowHelpDueToError,
                }
            }
            Some(cmd @ ("poses" | "p")) => {
                if let Some(extra) = positionals.first() {
                    log_warning!("Unexpected argument for {}: {}", cmd, extra);
                    CliAction::ShowHelpDueToError
                } else if simulate_only {
                    log_warning!("Simulation options only apply to the simulate command");
                    CliAction::ShowHelpDueToError
                } else {
                    CliAction::Poses {
                        debug_enabled,
                        config_dir,
                    }
                }
            }
            Some("help") => {
                if positionals.len() > 1 {
                    log_warning!("help takes at most one command");
                    CliAction::ShowHelpDueToError
                } else {
                    CliAction::HelpCommand {
                        command: positionals.into_iter().next(),
                    }
                }
            }
            Some(unknown) => {
                log_warning!("Unknown command: {}", unknown);
                CliAction::ShowHelpDueToError
            }
        };

        ParsedArgs { action }
    }

    fn parse_steps(positionals: &[String]) -> Option<Vec<ScriptStep>> {
        if positionals.is_empty() {
            log_warning!("Missing clicks. Usage: slidenav simulate <target[@ms]>...");
            return None;
        }

        let mut steps = Vec::with_capacity(positionals.len());
        for raw in positionals {
            match ScriptStep::parse(raw) {
                Ok(step) => steps.push(step),
                Err(e) => {
                    log_warning!("{}", e);
                    return None;
                }
            }
        }
        Some(steps)
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Value following the flag at `idx`, unless it is missing or another flag.
fn value_after(args: &[String], idx: usize) -> Option<String> {
    args.get(idx + 1)
        .filter(|value| !value.starts_with('-'))
        .cloned()
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    crate::common::logger::write_output(&format!("┗ {}\n", env!("CARGO_PKG_DESCRIPTION")));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("slidenav [OPTIONS] <COMMAND>");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("simulate, sim <target[@ms]>...  Run scripted clicks through the sequencer");
    log_indented!("poses, p                        Print the pose for every phase and direction");
    log_indented!("help [COMMAND]                  Show detailed help for a command");
    log_end!();
}
