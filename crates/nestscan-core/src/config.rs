//! Scan configuration.

use std::path::PathBuf;

use crate::Result;
use crate::classifier::Classifier;

/// Per-scan settings, read-only once scanning begins.
///
/// # Examples
///
/// ```
/// use nestscan_core::ScanConfig;
///
/// // Deliver everything, recurse into archives, no deduplication
/// let config = ScanConfig::default();
/// assert!(!config.skip_archives);
///
/// let custom = ScanConfig {
///     verify_checksums: true,
///     include_patterns: vec![r".*\.txt".into()],
///     ..Default::default()
/// };
/// assert!(custom.compile().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Never open archives; archive files are ignored rather than delivered.
    pub skip_archives: bool,

    /// Deliver each distinct content (by CRC32) only once per scan.
    pub verify_checksums: bool,

    /// Regular expressions a file name must fully match (any of them).
    pub include_patterns: Vec<String>,

    /// Regular expressions that veto an included file name.
    pub exclude_patterns: Vec<String>,

    /// Directory under which extraction workspaces are created.
    ///
    /// `None` uses the system temp directory.
    pub temp_root: Option<PathBuf>,
}

impl Default for ScanConfig {
    /// Default values:
    /// - `skip_archives`: false
    /// - `verify_checksums`: false
    /// - `include_patterns`: `[".*"]`
    /// - `exclude_patterns`: `[""]` (an empty pattern never matches)
    /// - `temp_root`: system temp directory
    fn default() -> Self {
        Self {
            skip_archives: false,
            verify_checksums: false,
            include_patterns: vec![".*".to_string()],
            exclude_patterns: vec![String::new()],
            temp_root: None,
        }
    }
}

impl ScanConfig {
    /// Replaces the include patterns.
    #[must_use]
    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the exclude patterns.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether archives are skipped.
    #[must_use]
    pub fn with_skip_archives(mut self, skip: bool) -> Self {
        self.skip_archives = skip;
        self
    }

    /// Sets whether content checksums are used for deduplication.
    #[must_use]
    pub fn with_verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Sets the directory that holds extraction workspaces.
    #[must_use]
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Returns the directory extraction workspaces are created in.
    #[must_use]
    pub fn workspace_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Compiles the patterns into a classifier.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidPattern` for the first pattern that is not a
    /// valid regular expression.
    pub fn compile(&self) -> Result<Classifier> {
        Classifier::new(
            &self.include_patterns,
            &self.exclude_patterns,
            self.skip_archives,
        )
    }
}
