//! Timestamp handling
//!
//! This module turns creation timestamps into the date-based folder a
//! file is placed in, and reads embedded capture dates from images.

pub mod exif;

use crate::config::GroupingStrategy;
use chrono::{DateTime, Datelike, Local};

/// Where a file's creation timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Capture date embedded in the image's EXIF metadata
    Exif,
    /// Creation (or, where unavailable, modification) time of the file system entry
    FileSystem,
}

/// Relative folder path for `timestamp` under `strategy`, in the local time zone
///
/// - Year: `YYYY`
/// - Month: `YYYY/MM`
/// - Day: `YYYY/MM/YYYY-MM-DD`
pub fn bucket_path(timestamp: &DateTime<Local>, strategy: GroupingStrategy) -> String {
    let year = timestamp.year();
    let month = timestamp.month();

    match strategy {
        GroupingStrategy::Year => format!("{:04}", year),
        GroupingStrategy::Month => format!("{:04}/{:02}", year, month),
        GroupingStrategy::Day => format!(
            "{:04}/{:02}/{:04}-{:02}-{:02}",
            year,
            month,
            year,
            month,
            timestamp.day()
        ),
    }
}
