// fairy/src/main.rs

use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;

mod cache;
mod cli;
mod commands;
mod manifest;

use cli::{Cli, Commands, RulepackCommands};

/// Exit code for fatal errors (bad rulepack, params or inputs).
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1. Setup Logging (Tracing), always on stderr so stdout stays clean
    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Preflight(args) => commands::preflight::execute(args),
        Commands::Rulepack(RulepackCommands::Check { path }) => commands::rulepack::check(&path),
        Commands::Rulepack(RulepackCommands::Types) => commands::rulepack::types(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
