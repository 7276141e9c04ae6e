//! Help command implementation for slidenav.
//!
//! Shows command-specific help or the general command list.

use anyhow::Result;

/// Show brief usage for a command (used for error messages)
pub fn show_command_usage(command: &str) {
    match command {
        "simulate" | "sim" => {
            log_block_start!("Usage: slidenav simulate <target[@ms]>... [OPTIONS]")
        }
        "poses" | "p" => log_block_start!("Usage: slidenav poses"),
        _ => log_block_start!("Usage: slidenav [OPTIONS] <COMMAND>"),
    }
}

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("simulate" | "sim") => super::simulate::display_help(),
        Some("poses" | "p") => super::poses::display_help(),
        Some("help") => display_help_help(),
        Some(unknown) => {
            log_pipe!();
            log_warning!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("simulate, sim <target[@ms]>...  Run scripted clicks through the sequencer");
    log_indented!("poses, p                        Print the pose for every phase and direction");
    log_indented!("help [COMMAND]                  Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'slidenav help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'slidenav --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: slidenav help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("slidenav help");
    log_indented!("slidenav help simulate");
    log_end!();
}
