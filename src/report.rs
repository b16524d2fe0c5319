//! Reporting of per-file actions and run results
//!
//! The organiser talks to a [`Reporter`]; [`ConsoleReporter`] renders the
//! events as styled terminal lines.

use crate::config::{Config, TransferStrategy};
use crate::process::RunSummary;
use byte_unit::{Byte, UnitType};
use crossterm::{
    ExecutableCommand,
    style::{Color, Print, Stylize, style},
};
use std::io::{Stderr, Stdout, Write, stderr, stdout};
use std::path::Path;

/// Receiver of organiser events
pub trait Reporter {
    /// A file was (or in a dry run would have been) copied or moved
    fn file_action(&mut self, source: &Path, destination: &Path, strategy: TransferStrategy, dry_run: bool);

    fn file_skipped(&mut self, path: &Path, reason: &str);

    /// Final result of a completed run
    fn summary(&mut self, dry_run: bool, summary: &RunSummary);

    /// Fatal error that aborted the run
    fn error(&mut self, message: &str);

    /// Per-file error tolerated in soft-fail mode
    fn soft_error(&mut self, message: &str);
}

/// Console theme colors
pub struct CliTheme;

impl CliTheme {
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// What the console reporter prints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterOptions {
    /// Print a line for every file
    pub verbose: bool,
    /// Suppress the final summary
    pub skip_summary: bool,
}

impl From<&Config> for ReporterOptions {
    fn from(config: &Config) -> Self {
        Self {
            verbose: config.verbose,
            skip_summary: false,
        }
    }
}

/// [`Reporter`] writing styled lines to an output and an error stream
pub struct ConsoleReporter<W: Write = Stdout, E: Write = Stderr> {
    out: W,
    err: E,
    options: ReporterOptions,
}

impl ConsoleReporter<Stdout, Stderr> {
    pub fn new(options: ReporterOptions) -> Self {
        Self::with_writers(stdout(), stderr(), options)
    }
}

impl<W: Write, E: Write> ConsoleReporter<W, E> {
    pub fn with_writers(out: W, err: E, options: ReporterOptions) -> Self {
        Self { out, err, options }
    }

    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }

    fn print_verbose(&mut self, line: impl std::fmt::Display) {
        if self.options.verbose {
            let _ = self.out.execute(Print(format!("{}\n", line)));
        }
    }
}

/// Human readable byte count, e.g. "1.5 MB"
pub fn format_bytes(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Decimal)
        .to_string()
}

impl<W: Write, E: Write> Reporter for ConsoleReporter<W, E> {
    fn file_action(&mut self, source: &Path, destination: &Path, strategy: TransferStrategy, dry_run: bool) {
        let verb = match (strategy, dry_run) {
            (TransferStrategy::Copy, false) => "Copied",
            (TransferStrategy::Move, false) => "Moved",
            (TransferStrategy::Copy, true) => "Would copy",
            (TransferStrategy::Move, true) => "Would move",
        };
        self.print_verbose(format!(
            "{} file from {} to {}",
            verb,
            source.display(),
            destination.display()
        ));
    }

    fn file_skipped(&mut self, path: &Path, reason: &str) {
        let line = format!("Skipping file at {} ({})", path.display(), reason);
        self.print_verbose(style(line).with(CliTheme::WARNING));
    }

    fn summary(&mut self, dry_run: bool, summary: &RunSummary) {
        if self.options.skip_summary {
            return;
        }

        let message = if dry_run {
            format!(
                "SUCCESS |> Processed {} files.\nSUCCESS |> Dry run completed. No files were moved or copied.",
                summary.files_processed
            )
        } else {
            format!(
                "SUCCESS |> Processed {} files.\nSUCCESS |> Files written: {} files ({}). {} files skipped.",
                summary.files_processed,
                summary.files_written,
                format_bytes(summary.bytes_written),
                summary.files_skipped
            )
        };
        let _ = self.out.execute(Print(style(message).with(CliTheme::SUCCESS)));
        let _ = self.out.execute(Print("\n"));
    }

    fn error(&mut self, message: &str) {
        let line = format!("ERROR |> {}", message);
        let _ = self.err.execute(Print(style(line).with(CliTheme::ERROR).bold()));
        let _ = self.err.execute(Print("\n"));
    }

    fn soft_error(&mut self, message: &str) {
        let line = format!("NON-FATAL |> {}", message);
        let _ = self.err.execute(Print(style(line).with(CliTheme::ERROR).bold()));
        let _ = self.err.execute(Print("\n"));
    }
}
