//! Scan statistics.

use std::path::PathBuf;
use std::time::Duration;

use crate::ScanError;
use crate::error::ErrorScope;

/// A recovered error, kept for the final summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
    /// Logical path of the entry or archive that failed.
    pub path: PathBuf,
    /// How much work was skipped.
    pub scope: ErrorScope,
    /// Rendered error.
    pub message: String,
}

/// Report of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Files passed to the consumer.
    pub files_delivered: usize,

    /// Files not delivered because their checksum was already seen.
    pub duplicates_skipped: usize,

    /// Archives whose entries were listed.
    pub archives_opened: usize,

    /// Real directories entered.
    pub directories_visited: usize,

    /// Archive entries materialized into a workspace.
    pub entries_extracted: usize,

    /// Recovered errors in the order they happened.
    pub errors: Vec<ScanIssue>,

    /// Wall time of the scan.
    pub duration: Duration,
}

impl ScanReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a recovered error at the scope the error itself implies.
    pub fn add_error(&mut self, path: impl Into<PathBuf>, error: &ScanError) {
        self.add_issue(path, error.scope(), error);
    }

    /// Records a recovered error at an explicit scope.
    pub fn add_issue(&mut self, path: impl Into<PathBuf>, scope: ErrorScope, error: &ScanError) {
        self.errors.push(ScanIssue {
            path: path.into(),
            scope,
            message: error.to_string(),
        });
    }

    /// Returns whether any error was recovered from.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Adds another report's counters and errors to this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestscan_core::ScanReport;
    ///
    /// let mut total = ScanReport { files_delivered: 2, ..Default::default() };
    /// total.merge(ScanReport { files_delivered: 3, ..Default::default() });
    /// assert_eq!(total.files_delivered, 5);
    /// ```
    pub fn merge(&mut self, other: Self) {
        self.files_delivered += other.files_delivered;
        self.duplicates_skipped += other.duplicates_skipped;
        self.archives_opened += other.archives_opened;
        self.directories_visited += other.directories_visited;
        self.entries_extracted += other.entries_extracted;
        self.errors.extend(other.errors);
        self.duration += other.duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_error_records_scope() {
        let mut report = ScanReport::new();
        assert!(!report.has_errors());

        let err = ScanError::InvalidArchive {
            path: PathBuf::from("/tmp/x.zip"),
            reason: "truncated".into(),
        };
        report.add_error("root/x.zip", &err);

        assert!(report.has_errors());
        assert_eq!(report.errors[0].scope, ErrorScope::Archive);
        assert_eq!(report.errors[0].path, PathBuf::from("root/x.zip"));
        assert!(report.errors[0].message.contains("truncated"));
    }

    #[test]
    fn test_merge() {
        let mut a = ScanReport {
            files_delivered: 1,
            archives_opened: 1,
            duration: Duration::from_millis(5),
            ..Default::default()
        };
        let mut b = ScanReport {
            files_delivered: 2,
            duplicates_skipped: 4,
            duration: Duration::from_millis(7),
            ..Default::default()
        };
        b.add_error("p", &ScanError::EntryNotFound { index: 0 });

        a.merge(b);
        assert_eq!(a.files_delivered, 3);
        assert_eq!(a.duplicates_skipped, 4);
        assert_eq!(a.archives_opened, 1);
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.duration, Duration::from_millis(12));
    }
}
