//! Per-file metadata resolution
//!
//! Classifies a source entry, determines its size and picks the timestamp
//! used to place it: the embedded EXIF capture date when requested and
//! available, the file system creation date otherwise.

use crate::error::{Error, Result};
use crate::time::{TimeSource, exif};
use chrono::{DateTime, Local};
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory extensions treated as a single logical file (bundles)
pub const PACKAGE_EXTENSIONS: &[&str] = &[
    "app",
    "bundle",
    "framework",
    "plugin",
    "kext",
    "photoslibrary",
    "imovielibrary",
    "fcpbundle",
    "rtfd",
    "pages",
    "numbers",
    "key",
];

/// Resolved facts about one source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path used for file system access
    pub path: PathBuf,
    /// Path relative to the source directory
    pub relative_path: PathBuf,
    /// File size in bytes, total size for packages
    pub size: Option<u64>,
    /// Best known creation timestamp
    pub created: DateTime<Local>,
    /// Where `created` came from
    pub time_source: TimeSource,
    pub is_regular_file_or_package: bool,
}

/// Check whether a directory path carries a package extension
pub fn has_package_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            let ext = ext.to_lowercase();
            PACKAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn is_package(path: &Path, metadata: &Metadata) -> bool {
    metadata.is_dir() && has_package_extension(path)
}

/// Creation time of the entry, or its modification time where the
/// platform does not record a birth time
fn creation_date(path: &Path, metadata: &Metadata) -> Result<DateTime<Local>> {
    let time = metadata
        .created()
        .or_else(|_| {
            debug!(?path, "No birth time available, using modification time");
            metadata.modified()
        })
        .map_err(|_| Error::UnknownCreationDate {
            path: path.to_path_buf(),
        })?;
    Ok(DateTime::<Local>::from(time))
}

fn package_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum()
}

/// Resolve the [`FileRecord`] of `path`.
///
/// Symbolic links are not followed: a link is neither a regular file nor a
/// package, whether or not its target exists.
///
/// Failing to read the entry's type or creation date is an error for this
/// entry. Failing to read an embedded capture date is not: a warning is
/// logged and the file system date is used instead.
pub fn resolve(path: &Path, relative_path: &Path, prefer_embedded_date: bool) -> Result<FileRecord> {
    let metadata = fs::symlink_metadata(path).map_err(|source| Error::UnknownResourceType {
        path: path.to_path_buf(),
        source,
    })?;

    let package = is_package(path, &metadata);
    let is_regular_file_or_package = metadata.is_file() || package;

    let mut created = creation_date(path, &metadata)?;
    let mut time_source = TimeSource::FileSystem;

    if prefer_embedded_date && is_regular_file_or_package {
        match exif::extract_capture_date(path) {
            Ok(captured) => {
                debug!(?path, %captured, "Using EXIF capture date");
                created = captured;
                time_source = TimeSource::Exif;
            }
            Err(e) => {
                warn!(?path, error = %e, "Falling back to file system creation date");
            }
        }
    }

    let size = if metadata.is_file() {
        Some(metadata.len())
    } else if package {
        Some(package_size(path))
    } else {
        None
    };

    Ok(FileRecord {
        path: path.to_path_buf(),
        relative_path: relative_path.to_path_buf(),
        size,
        created,
        time_source,
        is_regular_file_or_package,
    })
}
