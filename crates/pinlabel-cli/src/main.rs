//! pinlabel CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use pinlabel_cli::{Args, error_adapter::to_reportables, render};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    // Exits with code 2 on invalid arguments
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting pinlabel");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = pinlabel_cli::run(&args) {
        let reporter = miette::GraphicalReportHandler::new();

        for reportable in to_reportables(&err) {
            error!("{}", render(&reporter, &reportable));
        }

        process::exit(err.exit_code());
    }

    info!("Completed successfully");
}
