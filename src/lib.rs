//! File Organiser - A CLI tool that sorts files into date-based folders
//!
//! This library provides functionality for organising the files of a source
//! directory into a destination directory with support for:
//! - Year, month or day grouping
//! - Copy or move transfers, with dry runs
//! - Glob filtering on paths relative to the source
//! - EXIF capture dates for images
//! - Soft-fail mode that keeps going past per-file errors

pub mod cli;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod glob;
pub mod metadata;
pub mod process;
pub mod report;
pub mod time;
pub mod walk;

#[cfg(test)]
mod testing;

pub use cli::Cli;
pub use config::{Config, ConfigError, GroupingStrategy, TransferStrategy};
pub use error::{Error, Result};
pub use file_handler::{FileHandler, LocalFileHandler};
pub use glob::GlobFilter;
pub use process::{Organiser, RunOptions, RunSummary};
pub use report::{ConsoleReporter, Reporter, ReporterOptions};
