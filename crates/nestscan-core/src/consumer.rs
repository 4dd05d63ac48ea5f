//! Consumer capabilities invoked by the scanner.
//!
//! `FileConsumer` receives every delivered file. `ArchiveConsumer` is an
//! optional hook that sees each archive before it is opened and may take
//! over its handling.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::checksum::Checksum;
use crate::formats::detect::FormatHint;

/// A file handed to the consumer.
///
/// `physical` is only valid during the callback when the file was extracted
/// from an archive: its workspace is removed right after the call returns.
#[derive(Debug, Clone, Copy)]
pub struct DeliveredFile<'a> {
    /// Where the bytes are on disk right now.
    pub physical: &'a Path,
    /// Path including archive segments, e.g. `root/outer.zip/inner.tar/a.txt`.
    pub logical: &'a Path,
    /// Content CRC32, or `Checksum::UNKNOWN` when checksums are not verified
    /// and no archive metadata supplied one.
    pub checksum: Checksum,
    /// Nesting below the scan root; directories and archives both count.
    pub depth: usize,
}

/// Receives delivered files.
///
/// # Examples
///
/// ```
/// use nestscan_core::DeliveredFile;
/// use nestscan_core::FileConsumer;
///
/// struct Printer;
///
/// impl FileConsumer for Printer {
///     fn on_file(&mut self, file: &DeliveredFile<'_>) -> nestscan_core::Result<()> {
///         println!("{}", file.logical.display());
///         Ok(())
///     }
/// }
/// ```
pub trait FileConsumer {
    /// Called once per delivered file.
    ///
    /// # Errors
    ///
    /// An error is logged by the scanner and treated as a failure of this
    /// one file; scanning continues.
    fn on_file(&mut self, file: &DeliveredFile<'_>) -> Result<()>;
}

impl<F> FileConsumer for F
where
    F: FnMut(&DeliveredFile<'_>) -> Result<()>,
{
    fn on_file(&mut self, file: &DeliveredFile<'_>) -> Result<()> {
        self(file)
    }
}

/// What the scanner does with an archive after the hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveAction {
    /// Open it and scan its entries.
    Recurse,
    /// The consumer dealt with it; skip built-in extraction.
    Handled,
}

/// Optional hook for custom archive handling.
pub trait ArchiveConsumer {
    /// Called before an archive is opened.
    fn on_archive_open(
        &mut self,
        physical: &Path,
        logical: &Path,
        hint: FormatHint,
    ) -> Result<ArchiveAction>;
}

/// One delivery as recorded by `FileCollector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    /// Logical path.
    pub logical: PathBuf,
    /// Physical path at delivery time (may no longer exist).
    pub physical: PathBuf,
    /// Checksum passed with the delivery.
    pub checksum: Checksum,
    /// Nesting below the scan root.
    pub depth: usize,
    /// File content, when the collector was asked to capture it.
    pub content: Option<Vec<u8>>,
}

/// Records every delivery.
#[derive(Debug, Default)]
pub struct FileCollector {
    files: Vec<CollectedFile>,
    capture_content: bool,
}

impl FileCollector {
    /// Creates a collector that records paths and checksums.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collector that also reads each file's bytes while the
    /// physical path is still valid.
    #[must_use]
    pub fn capturing_content() -> Self {
        Self {
            files: Vec::new(),
            capture_content: true,
        }
    }

    /// Deliveries in order.
    #[must_use]
    pub fn files(&self) -> &[CollectedFile] {
        &self.files
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_files(self) -> Vec<CollectedFile> {
        self.files
    }

    /// Number of deliveries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing was delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileConsumer for FileCollector {
    fn on_file(&mut self, file: &DeliveredFile<'_>) -> Result<()> {
        let content = if self.capture_content {
            Some(std::fs::read(file.physical)?)
        } else {
            None
        };
        self.files.push(CollectedFile {
            logical: file.logical.to_path_buf(),
            physical: file.physical.to_path_buf(),
            checksum: file.checksum,
            depth: file.depth,
            content,
        });
        Ok(())
    }
}
