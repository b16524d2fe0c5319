//! Glob filtering of source paths

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// Compiled glob pattern matched against paths relative to the source directory
#[derive(Debug, Clone)]
pub struct GlobFilter {
    original: String,
    matcher: GlobMatcher,
}

impl GlobFilter {
    /// Compile `pattern` eagerly.
    ///
    /// An empty pattern means "no filtering" and yields `None`. Malformed
    /// patterns fail with [`Error::InvalidPattern`].
    pub fn new(pattern: &str) -> Result<Option<Self>> {
        if pattern.is_empty() {
            return Ok(None);
        }

        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Some(Self {
            original: pattern.to_string(),
            matcher: glob.compile_matcher(),
        }))
    }

    /// Compile an optional pattern, treating `None` like an empty pattern
    pub fn from_option(pattern: Option<&str>) -> Result<Option<Self>> {
        match pattern {
            Some(pattern) => Self::new(pattern),
            None => Ok(None),
        }
    }

    pub fn matches(&self, relative_path: &Path) -> bool {
        self.matcher.is_match(relative_path)
    }

    pub fn pattern(&self) -> &str {
        &self.original
    }
}
