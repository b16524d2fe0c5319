//! Recursive enumeration of the source directory

use crate::error::{Error, Result};
use crate::metadata::has_package_extension;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, FilterEntry, WalkDir};

type VisibleEntries = FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>;

/// Lazy iterator over all entries below a root directory.
///
/// Yields paths relative to the root in file system order. Hidden entries
/// are skipped, as are the contents of package directories (the package
/// itself is still yielded). Entries that cannot be read are yielded as
/// errors so the caller can decide whether to continue.
pub struct Walk {
    root: PathBuf,
    inner: VisibleEntries,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !is_hidden(entry)
}

/// Start enumerating `root`.
///
/// Fails with [`Error::EnumerationFailed`] when `root` does not exist or
/// cannot be listed.
pub fn walk_entries(root: &Path) -> Result<Walk> {
    fs::read_dir(root).map_err(|e| Error::EnumerationFailed {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let inner = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(is_visible as fn(&DirEntry) -> bool);

    Ok(Walk {
        root: root.to_path_buf(),
        inner,
    })
}

impl Iterator for Walk {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(Error::Walk(e))),
        };

        if entry.file_type().is_dir() && has_package_extension(entry.path()) {
            debug!(path = ?entry.path(), "Not descending into package");
            self.inner.skip_current_dir();
        }

        let relative = entry
            .path()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| entry.path().to_path_buf());
        Some(Ok(relative))
    }
}

/// Feed each entry of `entries` to `on_entry`.
///
/// With `soft_fail`, a failing entry (enumeration error or an error from
/// `on_entry`) is passed to `on_soft_failure` and iteration continues.
/// Without it the first error aborts and is returned.
pub fn visit<I, F, S>(entries: I, soft_fail: bool, mut on_entry: F, mut on_soft_failure: S) -> Result<()>
where
    I: IntoIterator<Item = Result<PathBuf>>,
    F: FnMut(&Path) -> Result<()>,
    S: FnMut(Error),
{
    for entry in entries {
        let outcome = entry.and_then(|relative| on_entry(&relative));
        if let Err(e) = outcome {
            if soft_fail {
                on_soft_failure(e);
            } else {
                return Err(e);
            }
        }
    }
    Ok(())
}
