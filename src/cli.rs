//! CLI argument parsing with clap

use crate::config::{Config, GroupingStrategy, TransferStrategy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// File Organiser - sort files into date-based folders
///
/// Organises files from a source directory into a destination directory.
/// Depending on the chosen date grouping strategy, files are placed into
/// year, month or day subfolders.
#[derive(Parser, Debug)]
#[command(name = "file-organiser")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML format)
    ///
    /// Settings from the file are used as defaults; CLI arguments override them.
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Print every file action and enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Write the log file as JSON
    #[arg(long, global = true)]
    pub json_log: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy matched files into the destination, originals stay where they are
    Copy(Options),
    /// Move matched files into the destination
    Move(Options),
    /// Print a sample configuration file
    SampleConfig,
}

/// Options shared by the copy and move subcommands
#[derive(Args, Debug, Default)]
pub struct Options {
    /// The directory to copy or move files from
    pub source: Option<PathBuf>,

    /// The directory matched files are copied or moved to
    pub destination: Option<PathBuf>,

    /// Only files whose path relative to the source matches this glob are handled
    #[arg(short = 'p', long)]
    pub file_pattern: Option<String>,

    /// The strategy with which files are grouped into subfolders [default: month]
    #[arg(short, long, value_enum)]
    pub date_strategy: Option<GroupingStrategy>,

    /// Only print what would be done, without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep running when individual files fail
    #[arg(long)]
    pub soft_fail: bool,

    /// Prefer the EXIF capture date of images over the file system creation date
    #[arg(long)]
    pub use_exif: bool,
}

impl Cli {
    /// Subcommand options together with the transfer they imply
    pub fn transfer_options(&self) -> Option<(TransferStrategy, &Options)> {
        match &self.command {
            Command::Copy(options) => Some((TransferStrategy::Copy, options)),
            Command::Move(options) => Some((TransferStrategy::Move, options)),
            Command::SampleConfig => None,
        }
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some((transfer, options)) = self.transfer_options() {
            config.transfer = transfer;
            if let Some(ref source) = options.source {
                config.source = source.clone();
            }
            if let Some(ref destination) = options.destination {
                config.destination = destination.clone();
            }
            if let Some(ref pattern) = options.file_pattern {
                config.file_pattern = Some(pattern.clone());
            }
            if let Some(strategy) = options.date_strategy {
                config.date_strategy = strategy;
            }
            if options.dry_run {
                config.dry_run = true;
            }
            if options.soft_fail {
                config.soft_fail = true;
            }
            if options.use_exif {
                config.use_exif = true;
            }
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    ///
    /// Fails when source or destination is missing.
    pub fn to_config(&self) -> crate::Result<Config> {
        let (_, options) = self
            .transfer_options()
            .ok_or_else(|| crate::Error::Config("no copy or move command given".into()))?;

        if options.source.is_none() || options.destination.is_none() {
            return Err(crate::Error::Config(
                "source and destination directories are required".into(),
            ));
        }

        Ok(self.merge_with_config(Config::default()))
    }
}
