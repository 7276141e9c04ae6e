//! Main application entry point.
//!
//! Parses the command line and hands off to the matching command handler.
//! Errors from commands are reported with the logger's closing marker and a
//! non-zero exit code.

use slidenav::args::{self, CliAction, ParsedArgs};
use slidenav::commands;
use slidenav::commands::simulate::SimulateOptions;
use slidenav::common::constants::EXIT_FAILURE;
use slidenav::common::logger::Log;
use slidenav::{log_end, log_error_exit, log_indented};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::HelpCommand { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Poses {
            debug_enabled,
            config_dir,
        } => {
            Log::set_debug_enabled(debug_enabled);
            commands::poses::handle_poses_command(debug_enabled, config_dir)
        }
        CliAction::Simulate {
            debug_enabled,
            config_dir,
            steps,
            fps,
            realtime,
            json,
            log_file,
        } => {
            Log::set_debug_enabled(debug_enabled);
            commands::simulate::handle_simulate_command(SimulateOptions {
                debug_enabled,
                config_dir,
                steps,
                fps,
                realtime,
                json,
                log_file,
            })
        }
    };

    if let Err(e) = result {
        // Errors are always shown, even when JSON output silenced the log
        Log::set_enabled(true);
        log_error_exit!("{}", e);
        for cause in e.chain().skip(1) {
            log_indented!("Caused by: {}", cause);
        }
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}
