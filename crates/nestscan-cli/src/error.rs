//! Error conversion utilities for CLI.
//!
//! Converts nestscan-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use nestscan_core::ScanError;
use std::path::Path;

/// Converts a fatal `ScanError` into an anyhow error with a hint.
///
/// `target` is the scan path being processed, if any.
pub fn convert_scan_error(err: ScanError, target: Option<&Path>) -> anyhow::Error {
    match err {
        ScanError::RootNotFound { path } => {
            anyhow!(
                "Path not found: '{}'\n\
                 HINT: Each PATH must be an existing file, archive or directory.",
                path.display()
            )
        }
        ScanError::InvalidPattern { pattern, reason } => {
            anyhow!(
                "Invalid pattern '{pattern}': {reason}\n\
                 HINT: Patterns are regular expressions matched against the whole file name, \
                 e.g. '.*\\.txt'."
            )
        }
        ScanError::BackendUnavailable { reason } => {
            anyhow!(
                "Archive support unavailable: {reason}\n\
                 HINT: Use --nozip to scan without opening archives."
            )
        }
        _ => match target {
            Some(path) => {
                anyhow::Error::from(err).context(format!("Error scanning '{}'", path.display()))
            }
            None => anyhow::Error::from(err),
        },
    }
}
