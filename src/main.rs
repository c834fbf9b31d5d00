#![allow(non_snake_case)]
use ElemMass::cli::args::Args;
use ElemMass::cli::cli_main::run_app;
use clap::Parser;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

pub fn main() {
    let args = Args::parse();
    if let Err(e) = TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Logger initialization failed: {}", e);
    }
    if let Err(e) = run_app(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
