//! File-name classification.
//!
//! Decides for a single file name whether it is ignored, delivered to the
//! consumer, or opened as an archive. Archive rules are consulted before the
//! user's include patterns so a match-all include never turns an archive into
//! a plain file.

use regex::Regex;

use crate::Result;
use crate::formats::detect::FormatHint;
use crate::formats::detect::FormatRule;
use crate::formats::detect::compile_whole_name;
use crate::formats::detect::default_rules;

/// Outcome of classifying a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not of interest.
    Ignore,
    /// Deliver to the file consumer.
    DeliverFile,
    /// Open with the given codec and scan its entries.
    OpenArchive(FormatHint),
}

/// Compiled include/exclude patterns plus the archive rule table.
///
/// # Examples
///
/// ```
/// use nestscan_core::Classification;
/// use nestscan_core::FormatHint;
/// use nestscan_core::ScanConfig;
///
/// let classifier = ScanConfig::default()
///     .with_exclude([r".*\.log"])
///     .compile()?;
///
/// assert_eq!(classifier.classify("notes.txt"), Classification::DeliverFile);
/// assert_eq!(classifier.classify("debug.LOG"), Classification::Ignore);
/// assert_eq!(
///     classifier.classify("bundle.zip"),
///     Classification::OpenArchive(FormatHint::Zip)
/// );
/// # Ok::<(), nestscan_core::ScanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<FormatRule>,
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    skip_archives: bool,
}

impl Classifier {
    /// Compiles the patterns.
    ///
    /// Empty patterns are dropped: an empty include or exclude pattern never
    /// matches anything.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidPattern` for the first invalid pattern.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S], skip_archives: bool) -> Result<Self> {
        Ok(Self {
            rules: default_rules()?,
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
            skip_archives,
        })
    }

    /// Classifies a bare file name (no directory components).
    pub fn classify(&self, name: &str) -> Classification {
        if let Some(rule) = self.rules.iter().find(|r| r.matches(name)) {
            if self.skip_archives || !rule.is_enabled() {
                return Classification::Ignore;
            }
            return Classification::OpenArchive(rule.hint());
        }

        if !self.include.iter().any(|re| re.is_match(name)) {
            return Classification::Ignore;
        }
        if self.exclude.iter().any(|re| re.is_match(name)) {
            return Classification::Ignore;
        }
        Classification::DeliverFile
    }

    /// Classifies the last component of `path`.
    ///
    /// Names that are not valid UTF-8 are matched in their lossy form, so
    /// invalid bytes only ever match a `.` in a pattern.
    pub fn classify_path(&self, path: &std::path::Path) -> Classification {
        path.file_name()
            .map_or(Classification::Ignore, |name| self.classify(&name.to_string_lossy()))
    }

    /// Number of effective include patterns.
    pub fn include_count(&self) -> usize {
        self.include.len()
    }

    /// Number of effective exclude patterns.
    pub fn exclude_count(&self) -> usize {
        self.exclude.len()
    }

    /// Whether archives are ignored instead of opened.
    pub const fn skips_archives(&self) -> bool {
        self.skip_archives
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .map(compile_whole_name)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;

    fn classifier(include: &[&str], exclude: &[&str], skip: bool) -> Classifier {
        Classifier::new(include, exclude, skip).unwrap()
    }

    #[test]
    fn test_archive_beats_include() {
        let c = classifier(&[".*"], &[""], false);
        assert_eq!(
            c.classify("data.tar"),
            Classification::OpenArchive(FormatHint::Tar)
        );
        assert_eq!(
            c.classify("data.tgz"),
            Classification::OpenArchive(FormatHint::GZip)
        );
    }

    #[test]
    fn test_archive_ignored_when_skipping() {
        let c = classifier(&[".*"], &[""], true);
        assert_eq!(c.classify("data.zip"), Classification::Ignore);
        assert_eq!(c.classify("data.txt"), Classification::DeliverFile);
    }

    #[test]
    fn test_archive_not_subject_to_include() {
        // Include patterns only filter leaf files
        let c = classifier(&[r".*\.txt"], &[""], false);
        assert_eq!(
            c.classify("bundle.zip"),
            Classification::OpenArchive(FormatHint::Zip)
        );
        assert_eq!(c.classify("image.png"), Classification::Ignore);
    }

    #[test]
    fn test_disabled_formats_ignored() {
        let c = classifier(&[".*"], &[""], false);
        assert_eq!(c.classify("dump.tar.bz2"), Classification::Ignore);
        assert_eq!(c.classify("dump.xz"), Classification::Ignore);
    }

    #[test]
    fn test_exclude_overrides_include() {
        let c = classifier(&[r"file_\d\..*"], &[r"file_[0246]\..*"], false);
        assert_eq!(c.classify("file_1.txt"), Classification::DeliverFile);
        assert_eq!(c.classify("file_2.txt"), Classification::Ignore);
        assert_eq!(c.classify("other.txt"), Classification::Ignore);
    }

    #[test]
    fn test_include_is_whole_name_and_case_insensitive() {
        let c = classifier(&[r"file_[0246]\..*"], &[""], false);
        assert_eq!(c.classify("FILE_4.TXT"), Classification::DeliverFile);
        assert_eq!(c.classify("my_file_4.txt"), Classification::Ignore);
        assert_eq!(c.classify("file_5.txt"), Classification::Ignore);
    }

    #[test]
    fn test_empty_patterns_never_match() {
        let c = classifier(&[".*"], &[""], false);
        assert_eq!(c.exclude_count(), 0);
        assert_eq!(c.classify(""), Classification::DeliverFile);

        let c = classifier(&[""], &[], false);
        assert_eq!(c.include_count(), 0);
        assert_eq!(c.classify("anything"), Classification::Ignore);
    }

    #[test]
    fn test_classify_path_uses_file_name() {
        let c = classifier(&[r"file_.*"], &[""], false);
        assert_eq!(
            c.classify_path(Path::new("root/outer.zip/inner/file_1.txt")),
            Classification::DeliverFile
        );
        assert_eq!(
            c.classify_path(Path::new("file_dir/readme.md")),
            Classification::Ignore
        );
        assert_eq!(
            c.classify_path(Path::new("root/outer.zip")),
            Classification::OpenArchive(FormatHint::Zip)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_path_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let c = classifier(&[r"caf.\.txt"], &[""], false);
        let name = Path::new(OsStr::from_bytes(b"caf\xe9.txt"));
        assert_eq!(c.classify_path(name), Classification::DeliverFile);

        let archive = Path::new(OsStr::from_bytes(b"\xff\xfe.zip"));
        assert_eq!(
            c.classify_path(archive),
            Classification::OpenArchive(FormatHint::Zip)
        );
    }
}
