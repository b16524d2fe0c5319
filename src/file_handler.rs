//! File system access used by the organiser
//!
//! [`FileHandler`] is the seam between the organiser and the disk;
//! [`LocalFileHandler`] is the real implementation.

use crate::error::{Error, Result};
use crate::metadata::{self, FileRecord};
use crate::walk;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Buffer size for file copies (256KB)
const COPY_BUFFER_SIZE: usize = 256 * 1024;

/// Boxed stream of source entries, relative to the enumerated root
pub type Entries<'a> = Box<dyn Iterator<Item = Result<PathBuf>> + 'a>;

/// File system operations the organiser needs
pub trait FileHandler {
    fn exists(&self, path: &Path) -> bool;

    /// Resolve metadata of `path`; see [`metadata::resolve`]
    fn resolve(&self, path: &Path, relative_path: &Path, prefer_embedded_date: bool) -> Result<FileRecord>;

    fn copy_item(&self, source: &Path, target: &Path) -> Result<()>;

    fn move_item(&self, source: &Path, target: &Path) -> Result<()>;

    /// Create `path` and any missing parents
    fn create_directory(&self, path: &Path) -> Result<()>;

    /// Enumerate everything below `root`; see [`walk::walk_entries`]
    fn entries<'a>(&'a self, root: &Path) -> Result<Entries<'a>>;
}

/// [`FileHandler`] backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileHandler;

impl LocalFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler for LocalFileHandler {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn resolve(&self, path: &Path, relative_path: &Path, prefer_embedded_date: bool) -> Result<FileRecord> {
        metadata::resolve(path, relative_path, prefer_embedded_date)
    }

    fn copy_item(&self, source: &Path, target: &Path) -> Result<()> {
        copy_entry(source, target).map_err(|error| Error::Transfer {
            operation: "copy",
            source_path: source.to_path_buf(),
            destination: target.to_path_buf(),
            error,
        })
    }

    fn move_item(&self, source: &Path, target: &Path) -> Result<()> {
        // Try rename first (faster for same filesystem)
        if fs::rename(source, target).is_ok() {
            return Ok(());
        }

        debug!(?source, ?target, "Rename failed, falling back to copy and delete");
        let moved = copy_entry(source, target).and_then(|_| remove_entry(source));
        moved.map_err(|error| Error::Transfer {
            operation: "move",
            source_path: source.to_path_buf(),
            destination: target.to_path_buf(),
            error,
        })
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn entries<'a>(&'a self, root: &Path) -> Result<Entries<'a>> {
        Ok(Box::new(walk::walk_entries(root)?))
    }
}

/// Copy a file, or a package directory recursively
fn copy_entry(source: &Path, target: &Path) -> std::io::Result<()> {
    let file_type = fs::symlink_metadata(source)?.file_type();
    if file_type.is_symlink() {
        return copy_symlink(source, target);
    }

    if file_type.is_dir() {
        fs::create_dir(target)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_entry(&entry.path(), &target.join(entry.file_name()))?;
        }
        return Ok(());
    }

    copy_file(source, target)?;

    // Preserve modification time
    if let Ok(metadata) = fs::metadata(source)
        && let Ok(mtime) = metadata.modified()
    {
        let _ = filetime::set_file_mtime(target, filetime::FileTime::from_system_time(mtime));
    }
    Ok(())
}

/// Links inside packages are recreated, not resolved
#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(source)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    copy_file(source, target)
}

fn remove_entry(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Copy file with buffered I/O; refuses to replace an existing target
fn copy_file(source: &Path, target: &Path) -> std::io::Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create_new(target)?;

    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, src_file);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dest_file);
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

    let mut total = 0u64;
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
        total += bytes_read as u64;
    }

    writer.flush()?;
    trace!(?source, ?target, bytes = total, "Copied file");
    Ok(())
}
