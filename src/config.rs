//! Configuration types for the file organiser

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Strategy used to group files into date-based subfolders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// Group by year: destination/YYYY/
    Year,
    /// Group by month: destination/YYYY/MM/
    #[default]
    Month,
    /// Group by day: destination/YYYY/MM/YYYY-MM-DD/
    Day,
}

/// How matched files reach the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransferStrategy {
    /// Copy files, originals stay in place
    #[default]
    Copy,
    /// Move files out of the source directory
    Move,
}

impl fmt::Display for TransferStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStrategy::Copy => write!(f, "copy"),
            TransferStrategy::Move => write!(f, "move"),
        }
    }
}

/// Configuration for a single organiser run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Directory files are taken from
    pub source: PathBuf,

    /// Directory the dated folders are created in
    pub destination: PathBuf,

    /// Optional glob pattern, matched against paths relative to `source`
    #[serde(default)]
    pub file_pattern: Option<String>,

    /// Copy or move
    #[serde(default)]
    pub transfer: TransferStrategy,

    /// Date grouping strategy
    #[serde(default)]
    pub date_strategy: GroupingStrategy,

    /// Only report what would happen
    #[serde(default)]
    pub dry_run: bool,

    /// Keep going when individual files fail
    #[serde(default)]
    pub soft_fail: bool,

    /// Prefer the EXIF capture date of images over the file system date
    #[serde(default)]
    pub use_exif: bool,

    /// Print every file action
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            destination: PathBuf::from("organised"),
            file_pattern: None,
            transfer: TransferStrategy::default(),
            date_strategy: GroupingStrategy::default(),
            dry_run: false,
            soft_fail: false,
            use_exif: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Check that the paths make sense before anything is touched
    ///
    /// Both paths are resolved first, so `./out` and `out` are the same
    /// destination.
    pub fn validate(&self) -> crate::Result<()> {
        if resolve_path(&self.destination).starts_with(resolve_path(&self.source)) {
            return Err(crate::Error::Config(format!(
                "destination {} is inside source {}",
                self.destination.display(),
                self.source.display()
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# File Organiser Configuration File
# This file uses TOML format (https://toml.io)

# Directory to take files from
source = "/Volumes/Card/DCIM"

# Directory the dated folders are created in
destination = "/Users/me/Pictures/Sorted"

# Optional glob pattern matched against paths relative to the source
# Examples: "**/*.jpg", "**/*.{jpg,jpeg,heic}"
file_pattern = "**/*.{jpg,jpeg}"

# "copy" keeps the originals, "move" removes them from the source
transfer = "copy"

# Date grouping strategy: "year", "month" or "day"
# - year:  2024/
# - month: 2024/01/
# - day:   2024/01/2024-01-19/
date_strategy = "month"

# Only print what would happen
dry_run = false

# Keep going when individual files fail
soft_fail = false

# Prefer the EXIF capture date of images over the file system creation date
use_exif = true

# Print every file action
verbose = false
"#
        .to_string()
    }
}

/// Absolute form of `path` with symlinks, `.` and `..` resolved for the
/// longest existing ancestor; the missing remainder is appended as is
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return missing.iter().rev().fold(canonical, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}
