//! File Organiser - sort files into date-based folders
//!
//! Copies or moves the files of a source directory into year, month or day
//! subfolders of a destination directory.

use anyhow::Result;
use clap::Parser;
use file_organiser::cli::Command;
use file_organiser::{
    Cli, Config, ConsoleReporter, LocalFileHandler, Organiser, Reporter, ReporterOptions,
    RunOptions,
};
use std::path::Path;
use std::process::ExitCode;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::SampleConfig = cli.command {
        print!("{}", Config::sample_config());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            ConsoleReporter::new(ReporterOptions::default()).error(&format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };

    // Dropped on return, which flushes the log file
    let _guard = match setup_logging(&cli, config.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            ConsoleReporter::new(ReporterOptions::default())
                .error(&format!("Failed to set up logging: {e:#}"));
            return ExitCode::FAILURE;
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        "File Organiser starting"
    );
    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    let reporter = ConsoleReporter::new(ReporterOptions::from(&config));
    let mut organiser = Organiser::new(LocalFileHandler::new(), reporter);

    // A fatal error has already been reported by the organiser
    match organiser.run(&RunOptions::from(&config)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Load configuration from file and/or CLI arguments, then validate it
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()?
    };

    config.validate()?;
    Ok(config)
}

/// Filter for one output layer; `RUST_LOG` takes precedence over `default`
fn env_filter(default: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Setup logging (console + optional file)
///
/// The console layer stays at `warn` unless verbose, since the reporter
/// already prints file actions and errors there.
fn setup_logging(cli: &Cli, verbose: bool) -> Result<Option<WorkerGuard>> {
    let (console_level, file_level) = if verbose {
        (Level::DEBUG, Level::DEBUG)
    } else {
        (Level::WARN, Level::INFO)
    };

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(env_filter(console_level)),
    );

    let Some(ref log_path) = cli.log_file else {
        subscriber.init();
        return Ok(None);
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .with_filter(env_filter(file_level)),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .with_filter(env_filter(file_level)),
            )
            .init();
    }

    Ok(Some(guard))
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?)
}
