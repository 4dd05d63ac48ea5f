//! Error types for scanning operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;

/// The smallest unit of work an error is allowed to abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// One directory entry or one archive entry is skipped.
    Entry,
    /// A whole archive is skipped; its siblings are still scanned.
    Archive,
    /// The scan cannot continue.
    Fatal,
}

impl std::fmt::Display for ErrorScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Archive => write!(f, "archive"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Errors that can occur while scanning a tree.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The scan root does not exist.
    #[error("scan root does not exist: {path}")]
    RootNotFound {
        /// The missing root.
        path: PathBuf,
    },

    /// An include or exclude pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern as given.
        pattern: String,
        /// Parser message.
        reason: String,
    },

    /// The archive format is recognized but has no working codec.
    #[error("unsupported archive format: {hint}")]
    UnsupportedFormat {
        /// Format token, e.g. `bz2`.
        hint: String,
    },

    /// Archive cannot be opened or listed.
    #[error("invalid archive {path}: {reason}")]
    InvalidArchive {
        /// Archive location on disk.
        path: PathBuf,
        /// Codec message.
        reason: String,
    },

    /// Requested entry index is not present in the archive.
    #[error("archive entry #{index} not found")]
    EntryNotFound {
        /// Provider index that was requested.
        index: usize,
    },

    /// A single entry could not be materialized.
    #[error("failed to extract '{entry}': {reason}")]
    Extraction {
        /// Entry name inside the archive.
        entry: String,
        /// Codec or filesystem message.
        reason: String,
    },

    /// The archive backend could not be initialized.
    #[error("archive backend unavailable: {reason}")]
    BackendUnavailable {
        /// Why initialization failed.
        reason: String,
    },

    /// The file consumer rejected a delivery.
    #[error("consumer failed on {path}: {reason}")]
    Consumer {
        /// Logical path of the delivered file.
        path: PathBuf,
        /// Consumer message.
        reason: String,
    },
}

impl ScanError {
    /// Returns `true` if this error must abort the whole scan.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestscan_core::ScanError;
    /// use std::path::PathBuf;
    ///
    /// let err = ScanError::RootNotFound {
    ///     path: PathBuf::from("/nowhere"),
    /// };
    /// assert!(err.is_fatal());
    ///
    /// let err = ScanError::EntryNotFound { index: 3 };
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. } | Self::BackendUnavailable { .. } | Self::InvalidPattern { .. }
        )
    }

    /// Returns the scope this error is recovered at.
    ///
    /// Errors raised while opening or listing an archive skip that archive;
    /// everything else that is not fatal skips a single entry.
    #[must_use]
    pub const fn scope(&self) -> ErrorScope {
        if self.is_fatal() {
            return ErrorScope::Fatal;
        }
        match self {
            Self::InvalidArchive { .. } | Self::UnsupportedFormat { .. } => ErrorScope::Archive,
            _ => ErrorScope::Entry,
        }
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::RootNotFound { path }
            | Self::InvalidArchive { path, .. }
            | Self::Consumer { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Builds a `Consumer` error from any displayable failure.
    pub fn consumer(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Consumer {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
