//! plotnn CLI entry point.

use std::{fmt::Write as _, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use plotnn::PlotnnError;
use plotnn_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    if let Err(err) = plotnn_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!("Completed successfully");
}

/// Initializes `env_logger`, falling back to `warn` for unknown levels.
fn init_logging(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting plotnn");
}

/// Renders every diagnostic of `err` through miette.
fn report(err: &PlotnnError) {
    let reporter = miette::GraphicalReportHandler::new();

    for reportable in to_reportables(err) {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, &reportable).is_err() {
            // Fall back to the plain message if the fancy report fails.
            writer.clear();
            let _ = write!(writer, "{reportable}");
        }
        error!("{writer}");
    }
}
