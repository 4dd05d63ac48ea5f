//! Archive format hints and the file-name rule table.
//!
//! Formats are declared from the file name, never sniffed from content.

use std::str::FromStr;

use regex::Regex;
use regex::RegexBuilder;

use crate::Result;
use crate::ScanError;

/// Short token identifying which codec opens an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatHint {
    /// ZIP archive.
    Zip,
    /// 7z archive.
    SevenZ,
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip stream, also used for `.tgz`.
    GZip,
    /// Microsoft cabinet.
    Cab,
    /// Bzip2 stream (recognized, no working codec).
    BZip2,
    /// XZ stream (recognized, no working codec).
    Xz,
}

impl FormatHint {
    /// Returns the canonical token for this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestscan_core::FormatHint;
    ///
    /// assert_eq!(FormatHint::SevenZ.as_str(), "7z");
    /// assert_eq!(FormatHint::GZip.as_str(), "gz");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::SevenZ => "7z",
            Self::Tar => "tar",
            Self::GZip => "gz",
            Self::Cab => "cab",
            Self::BZip2 => "bz2",
            Self::Xz => "xz",
        }
    }

    /// Returns `true` if the archive backend can open this format.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::BZip2 | Self::Xz)
    }
}

impl std::fmt::Display for FormatHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatHint {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "7z" => Ok(Self::SevenZ),
            "tar" => Ok(Self::Tar),
            "gz" | "tgz" => Ok(Self::GZip),
            "cab" => Ok(Self::Cab),
            "bz2" => Ok(Self::BZip2),
            "xz" => Ok(Self::Xz),
            _ => Err(ScanError::UnsupportedFormat { hint: s.to_string() }),
        }
    }
}

/// One entry of the ordered rule table.
#[derive(Debug, Clone)]
pub struct FormatRule {
    regex: Regex,
    hint: FormatHint,
    enabled: bool,
}

impl FormatRule {
    fn new(pattern: &str, hint: FormatHint, enabled: bool) -> Result<Self> {
        Ok(Self {
            regex: compile_whole_name(pattern)?,
            hint,
            enabled,
        })
    }

    /// Returns `true` if `name` matches this rule.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Format this rule maps to.
    #[must_use]
    pub const fn hint(&self) -> FormatHint {
        self.hint
    }

    /// Disabled rules still claim a name but never open it.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Builds the rule table in priority order; the first match wins.
///
/// `.tgz` maps to the gz codec, which yields an inner `.tar` entry.
pub fn default_rules() -> Result<Vec<FormatRule>> {
    Ok(vec![
        FormatRule::new(r".*\.zip", FormatHint::Zip, true)?,
        FormatRule::new(r".*\.7z", FormatHint::SevenZ, true)?,
        FormatRule::new(r".*\.tgz", FormatHint::GZip, true)?,
        FormatRule::new(r".*\.tar", FormatHint::Tar, true)?,
        FormatRule::new(r".*\.gz", FormatHint::GZip, true)?,
        FormatRule::new(r".*\.cab", FormatHint::Cab, true)?,
        FormatRule::new(r".*\.bz2", FormatHint::BZip2, false)?,
        FormatRule::new(r".*\.xz", FormatHint::Xz, false)?,
    ])
}

/// Compiles `pattern` so it must match the whole name, ignoring case.
///
/// # Errors
///
/// Returns `ScanError::InvalidPattern` if the pattern does not parse.
pub fn compile_whole_name(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
        .map_err(|e| ScanError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}
