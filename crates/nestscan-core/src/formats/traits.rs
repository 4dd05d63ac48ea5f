//! Archive backend abstraction.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::checksum::Checksum;
use crate::formats::detect::FormatHint;

/// Metadata for one entry as listed by an archive backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Backend position, passed back to `extract_entry`.
    pub index: usize,
    /// Relative path inside the archive, `/`-separated.
    pub name: String,
    /// Uncompressed size in bytes (0 if unknown).
    pub size: u64,
    /// Whether this entry is a directory.
    pub is_directory: bool,
    /// CRC32 from archive metadata, or `Checksum::UNKNOWN`.
    pub checksum: Checksum,
}

impl ArchiveEntry {
    /// Last path component of the entry name.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestscan_core::ArchiveEntry;
    /// use nestscan_core::checksum::Checksum;
    ///
    /// let entry = ArchiveEntry {
    ///     index: 0,
    ///     name: "docs/inner.tar".into(),
    ///     size: 10,
    ///     is_directory: false,
    ///     checksum: Checksum::UNKNOWN,
    /// };
    /// assert_eq!(entry.file_name(), "inner.tar");
    /// ```
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.name
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.name)
    }
}

/// Lists and extracts archive entries for a declared format.
///
/// One instance serves a whole scan; calls are strictly sequential.
pub trait ArchiveProvider {
    /// Prepares the backend before the first archive is opened.
    ///
    /// # Errors
    ///
    /// A failure here is fatal for the scan.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Lists entries in archive order.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be opened or read.
    fn list_entries(&mut self, archive: &Path, format: FormatHint) -> Result<Vec<ArchiveEntry>>;

    /// Writes the entry at `index` below `dest`, keeping its relative path,
    /// and returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or cannot be decoded.
    fn extract_entry(
        &mut self,
        archive: &Path,
        format: FormatHint,
        index: usize,
        dest: &Path,
    ) -> Result<PathBuf>;
}
