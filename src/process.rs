//! Main organiser
//!
//! Handles the core logic of:
//! - Walking the source directory
//! - Filtering entries by glob pattern
//! - Resolving creation dates
//! - Copying or moving files into date-based folders

use crate::config::{Config, GroupingStrategy, TransferStrategy};
use crate::error::{Error, Result};
use crate::file_handler::FileHandler;
use crate::glob::GlobFilter;
use crate::report::Reporter;
use crate::time::bucket_path;
use crate::walk;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span};

/// Why a file was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyExists,
    NotMatchingGlob,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::AlreadyExists => "File already exists",
            SkipReason::NotMatchingGlob => "File does not match glob pattern",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of handling a single source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Skipped(SkipReason),
    Written {
        source: PathBuf,
        destination: PathBuf,
        size: Option<u64>,
    },
    /// Not a regular file or package; not counted
    NotApplicable,
    SimulatedWrite {
        source: PathBuf,
        destination: PathBuf,
    },
}

/// Counters of one organiser run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_written: usize,
    pub files_skipped: usize,
    pub bytes_written: u64,
}

impl RunSummary {
    /// Account for one outcome
    pub fn record(self, outcome: &ProcessingOutcome) -> Self {
        match outcome {
            ProcessingOutcome::Skipped(_) => Self {
                files_processed: self.files_processed + 1,
                files_skipped: self.files_skipped + 1,
                ..self
            },
            ProcessingOutcome::Written { size, .. } => Self {
                files_processed: self.files_processed + 1,
                files_written: self.files_written + 1,
                bytes_written: self.bytes_written + size.unwrap_or(0),
                ..self
            },
            ProcessingOutcome::SimulatedWrite { .. } => Self {
                files_processed: self.files_processed + 1,
                ..self
            },
            ProcessingOutcome::NotApplicable => self,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed: {}, Written: {}, Skipped: {}, Bytes: {}",
            self.files_processed, self.files_written, self.files_skipped, self.bytes_written
        )
    }
}

/// Parameters of one organiser run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub glob_pattern: Option<String>,
    pub transfer: TransferStrategy,
    pub grouping: GroupingStrategy,
    pub dry_run: bool,
    pub soft_fail: bool,
    pub prefer_embedded_date: bool,
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            source: config.source.clone(),
            destination: config.destination.clone(),
            glob_pattern: config.file_pattern.clone(),
            transfer: config.transfer,
            grouping: config.date_strategy,
            dry_run: config.dry_run,
            soft_fail: config.soft_fail,
            prefer_embedded_date: config.use_exif,
        }
    }
}

/// Sorts the entries of a source directory into date-based folders
pub struct Organiser<H, R> {
    file_handler: H,
    reporter: R,
}

impl<H: FileHandler, R: Reporter> Organiser<H, R> {
    pub fn new(file_handler: H, reporter: R) -> Self {
        Self {
            file_handler,
            reporter,
        }
    }

    pub fn file_handler(&self) -> &H {
        &self.file_handler
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run the organiser.
    ///
    /// On success the summary is reported and returned. A fatal error is
    /// reported once and returned; no summary is produced in that case.
    pub fn run(&mut self, options: &RunOptions) -> Result<RunSummary> {
        let _span = span!(Level::INFO, "organiser_run").entered();

        match self.organise(options) {
            Ok(summary) => {
                info!(%summary, dry_run = options.dry_run, "Run complete");
                self.reporter.summary(options.dry_run, &summary);
                Ok(summary)
            }
            Err(e) => {
                info!(error = %e, "Run aborted");
                self.reporter.error(&e.to_string());
                Err(e)
            }
        }
    }

    fn organise(&mut self, options: &RunOptions) -> Result<RunSummary> {
        let glob = GlobFilter::from_option(options.glob_pattern.as_deref())?;

        info!(
            source = %options.source.display(),
            destination = %options.destination.display(),
            transfer = %options.transfer,
            grouping = ?options.grouping,
            dry_run = options.dry_run,
            "Organising files"
        );

        let Self {
            file_handler,
            reporter,
        } = self;
        let reporter = RefCell::new(reporter);
        let mut summary = RunSummary::default();

        walk::visit(
            file_handler.entries(&options.source)?,
            options.soft_fail,
            |relative| {
                let outcome = process_entry(&*file_handler, relative, glob.as_ref(), options)?;
                report_outcome(&mut **reporter.borrow_mut(), relative, &outcome, options);
                summary = summary.record(&outcome);
                Ok(())
            },
            |e| {
                info!(error = %e, "Failed to process entry, continuing");
                reporter.borrow_mut().soft_error(&e.to_string());
            },
        )?;

        Ok(summary)
    }
}

fn process_entry<H: FileHandler>(
    file_handler: &H,
    relative: &Path,
    glob: Option<&GlobFilter>,
    options: &RunOptions,
) -> Result<ProcessingOutcome> {
    let _entry_span = span!(Level::DEBUG, "process_entry", ?relative).entered();

    if let Some(glob) = glob
        && !glob.matches(relative)
    {
        debug!(pattern = glob.pattern(), "Entry does not match glob");
        return Ok(ProcessingOutcome::Skipped(SkipReason::NotMatchingGlob));
    }

    let path = options.source.join(relative);
    let record = file_handler.resolve(&path, relative, options.prefer_embedded_date)?;

    if !record.is_regular_file_or_package {
        return Ok(ProcessingOutcome::NotApplicable);
    }

    let file_name = relative.file_name().ok_or_else(|| Error::InvalidFileName {
        path: relative.to_path_buf(),
    })?;
    let bucket_dir = options
        .destination
        .join(bucket_path(&record.created, options.grouping));
    let target = bucket_dir.join(file_name);

    if options.dry_run {
        debug!(?target, time_source = ?record.time_source, "Would write file");
        return Ok(ProcessingOutcome::SimulatedWrite {
            source: relative.to_path_buf(),
            destination: target,
        });
    }

    if file_handler.exists(&target) {
        debug!(?target, "Target already exists");
        return Ok(ProcessingOutcome::Skipped(SkipReason::AlreadyExists));
    }

    file_handler.create_directory(&bucket_dir)?;
    match options.transfer {
        TransferStrategy::Copy => file_handler.copy_item(&path, &target)?,
        TransferStrategy::Move => file_handler.move_item(&path, &target)?,
    }

    info!(
        source = ?relative,
        destination = ?target,
        time_source = ?record.time_source,
        created = %record.created,
        "Processed file"
    );

    Ok(ProcessingOutcome::Written {
        source: relative.to_path_buf(),
        destination: target,
        size: record.size,
    })
}

fn report_outcome<R: Reporter>(
    reporter: &mut R,
    relative: &Path,
    outcome: &ProcessingOutcome,
    options: &RunOptions,
) {
    match outcome {
        ProcessingOutcome::Skipped(reason) => {
            reporter.file_skipped(relative, reason.description());
        }
        ProcessingOutcome::Written {
            source,
            destination,
            ..
        }
        | ProcessingOutcome::SimulatedWrite {
            source,
            destination,
        } => {
            reporter.file_action(source, destination, options.transfer, options.dry_run);
        }
        ProcessingOutcome::NotApplicable => {}
    }
}
