//! Persistence of the pricetape series file.
//!
//! The on-disk format is a JSON array of `[timestamp_seconds, price]`
//! pairs, sorted ascending with unique timestamps - the exact shape the
//! charting front end consumes. [`load`] tolerates a missing or corrupt
//! file (a fresh backfill follows); [`save`] replaces the file atomically
//! so a failed run can never leave a half-written series behind.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricetape/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use pricetape_types::Series;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while writing the series file.
///
/// Reading has no error type: a missing or unreadable prior file is "no
/// prior data" by design.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the temporary file next to the target.
    #[error("Failed to create temporary file in '{dir}': {source}")]
    CreateTemp {
        /// The directory the temporary file was created in.
        dir: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// Failed to serialize or write the series.
    #[error("Failed to write series for '{path}': {source}")]
    WriteSeries {
        /// The target path.
        path: PathBuf,
        /// The underlying JSON/I/O error.
        source: serde_json::Error,
    },

    /// Failed to move the temporary file over the target.
    #[error("Failed to replace '{path}': {source}")]
    Replace {
        /// The target path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// Loads the persisted series, treating a missing or corrupt file as empty.
///
/// A corrupt file gets a diagnostic on stderr; the run then proceeds as a
/// fresh backfill rather than aborting.
#[must_use]
pub fn load(path: &Path) -> Series {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                eprintln!("Warning: failed to read '{}': {e}", path.display());
            }
            return Series::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(series) => series,
        Err(e) => {
            eprintln!(
                "Warning: ignoring corrupt series file '{}': {e}",
                path.display()
            );
            Series::new()
        }
    }
}

/// Writes the series atomically.
///
/// Serializes into a temporary file in the target directory, then renames
/// it over `path`. The previous contents survive intact unless the whole
/// operation succeeds.
///
/// # Errors
///
/// Returns a [`StoreError`] if the temporary file cannot be created,
/// written, or moved into place.
pub fn save(path: &Path, series: &Series) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::CreateTemp {
        dir: dir.to_path_buf(),
        source: e,
    })?;

    serde_json::to_writer(&mut tmp, series).map_err(|e| StoreError::WriteSeries {
        path: path.to_path_buf(),
        source: e,
    })?;
    tmp.flush().map_err(|e| StoreError::Replace {
        path: path.to_path_buf(),
        source: e,
    })?;

    tmp.persist(path).map_err(|e| StoreError::Replace {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
