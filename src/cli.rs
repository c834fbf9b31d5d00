/// Command-line arguments (clap)
pub mod args;
/// One-shot subcommands
pub mod cli_commands;
/// Interactive menu and application entry point
pub mod cli_main;
