//! Test doubles shared by the unit tests

use crate::config::TransferStrategy;
use crate::error::{Error, Result};
use crate::file_handler::{Entries, FileHandler};
use crate::metadata::FileRecord;
use crate::process::RunSummary;
use crate::report::Reporter;
use crate::time::TimeSource;
use chrono::{DateTime, Local, TimeZone};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Noon of the given day in the local time zone
pub fn local_date(year: i32, month: u32, day: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid local date")
}

#[derive(Debug, Clone)]
enum FakeEntry {
    File {
        created: DateTime<Local>,
        size: Option<u64>,
    },
    Directory,
    Failing,
}

/// In-memory [`FileHandler`] that records every call
#[derive(Debug, Default)]
pub struct FakeFileHandler {
    order: Vec<PathBuf>,
    entries: HashMap<PathBuf, FakeEntry>,
    existing: RefCell<HashSet<PathBuf>>,
    failing_transfers: HashSet<PathBuf>,
    missing_root: bool,
    enumerated: Cell<bool>,
    resolved: RefCell<Vec<PathBuf>>,
    existence_checks: RefCell<Vec<PathBuf>>,
    copies: RefCell<Vec<(PathBuf, PathBuf)>>,
    moves: RefCell<Vec<(PathBuf, PathBuf)>>,
    created_directories: RefCell<Vec<PathBuf>>,
}

impl FakeFileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entry(mut self, relative: &str, entry: FakeEntry) -> Self {
        self.order.push(PathBuf::from(relative));
        self.entries.insert(PathBuf::from(relative), entry);
        self
    }

    pub fn with_file(self, relative: &str, created: DateTime<Local>, size: Option<u64>) -> Self {
        self.with_entry(relative, FakeEntry::File { created, size })
    }

    pub fn with_directory(self, relative: &str) -> Self {
        self.with_entry(relative, FakeEntry::Directory)
    }

    /// Entry whose metadata cannot be resolved
    pub fn with_failing(self, relative: &str) -> Self {
        self.with_entry(relative, FakeEntry::Failing)
    }

    /// File that resolves but cannot be copied or moved
    pub fn with_failing_transfer(mut self, relative: &str, created: DateTime<Local>) -> Self {
        self.failing_transfers.insert(PathBuf::from(relative));
        self.with_file(relative, created, Some(1))
    }

    fn check_transfer(&self, operation: &'static str, source: &Path, target: &Path) -> Result<()> {
        if self.failing_transfers.iter().any(|relative| source.ends_with(relative)) {
            return Err(Error::Transfer {
                operation,
                source_path: source.to_path_buf(),
                destination: target.to_path_buf(),
                error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        Ok(())
    }

    /// Destination path that already exists
    pub fn with_existing(self, path: &Path) -> Self {
        self.existing.borrow_mut().insert(path.to_path_buf());
        self
    }

    /// Make enumeration fail as if the source did not exist
    pub fn with_missing_root(mut self) -> Self {
        self.missing_root = true;
        self
    }

    pub fn was_enumerated(&self) -> bool {
        self.enumerated.get()
    }

    pub fn resolved(&self) -> Vec<PathBuf> {
        self.resolved.borrow().clone()
    }

    pub fn existence_checks(&self) -> Vec<PathBuf> {
        self.existence_checks.borrow().clone()
    }

    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.copies.borrow().clone()
    }

    pub fn moves(&self) -> Vec<(PathBuf, PathBuf)> {
        self.moves.borrow().clone()
    }

    pub fn created_directories(&self) -> Vec<PathBuf> {
        self.created_directories.borrow().clone()
    }
}

impl FileHandler for FakeFileHandler {
    fn exists(&self, path: &Path) -> bool {
        self.existence_checks.borrow_mut().push(path.to_path_buf());
        self.existing.borrow().contains(path)
    }

    fn resolve(&self, path: &Path, relative_path: &Path, _prefer_embedded_date: bool) -> Result<FileRecord> {
        self.resolved.borrow_mut().push(relative_path.to_path_buf());

        let record = |created, size, is_regular_file_or_package| FileRecord {
            path: path.to_path_buf(),
            relative_path: relative_path.to_path_buf(),
            size,
            created,
            time_source: TimeSource::FileSystem,
            is_regular_file_or_package,
        };

        match self.entries.get(relative_path) {
            Some(FakeEntry::File { created, size }) => Ok(record(*created, *size, true)),
            Some(FakeEntry::Directory) => Ok(record(local_date(2000, 1, 1), None, false)),
            Some(FakeEntry::Failing) | None => Err(Error::UnknownCreationDate {
                path: path.to_path_buf(),
            }),
        }
    }

    fn copy_item(&self, source: &Path, target: &Path) -> Result<()> {
        self.check_transfer("copy", source, target)?;
        self.copies
            .borrow_mut()
            .push((source.to_path_buf(), target.to_path_buf()));
        self.existing.borrow_mut().insert(target.to_path_buf());
        Ok(())
    }

    fn move_item(&self, source: &Path, target: &Path) -> Result<()> {
        self.check_transfer("move", source, target)?;
        self.moves
            .borrow_mut()
            .push((source.to_path_buf(), target.to_path_buf()));
        self.existing.borrow_mut().insert(target.to_path_buf());
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        self.created_directories.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn entries<'a>(&'a self, root: &Path) -> Result<Entries<'a>> {
        self.enumerated.set(true);
        if self.missing_root {
            return Err(Error::EnumerationFailed {
                path: root.to_path_buf(),
                message: "No such file or directory".into(),
            });
        }
        Ok(Box::new(self.order.iter().cloned().map(Ok)))
    }
}

/// Event received by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Action {
        source: PathBuf,
        destination: PathBuf,
        strategy: TransferStrategy,
        dry_run: bool,
    },
    Skipped {
        path: PathBuf,
        reason: String,
    },
    Summary {
        dry_run: bool,
        summary: RunSummary,
    },
    Error(String),
    SoftError(String),
}

/// [`Reporter`] that keeps every event in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }
}

impl Reporter for RecordingReporter {
    fn file_action(&mut self, source: &Path, destination: &Path, strategy: TransferStrategy, dry_run: bool) {
        self.events.push(ReportEvent::Action {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            strategy,
            dry_run,
        });
    }

    fn file_skipped(&mut self, path: &Path, reason: &str) {
        self.events.push(ReportEvent::Skipped {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    fn summary(&mut self, dry_run: bool, summary: &RunSummary) {
        self.events.push(ReportEvent::Summary {
            dry_run,
            summary: *summary,
        });
    }

    fn error(&mut self, message: &str) {
        self.events.push(ReportEvent::Error(message.to_string()));
    }

    fn soft_error(&mut self, message: &str) {
        self.events.push(ReportEvent::SoftError(message.to_string()));
    }
}

/// Write a minimal JPEG whose EXIF block only holds `DateTimeOriginal`
pub fn write_jpeg_with_capture_date(path: &Path, capture_date: &str) {
    const IFD0_OFFSET: u32 = 8;
    const EXIF_IFD_OFFSET: u32 = IFD0_OFFSET + 2 + 12 + 4;
    const STRING_OFFSET: u32 = EXIF_IFD_OFFSET + 2 + 12 + 4;

    let mut value = capture_date.as_bytes().to_vec();
    value.push(0);

    // Little-endian TIFF header
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&IFD0_OFFSET.to_le_bytes());

    // IFD0: pointer to the Exif IFD
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&EXIF_IFD_OFFSET.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    // Exif IFD: DateTimeOriginal as ASCII
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_le_bytes());
    tiff.extend_from_slice(&STRING_OFFSET.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&value);

    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(&tiff);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);

    fs::write(path, jpeg).expect("write test jpeg");
}
