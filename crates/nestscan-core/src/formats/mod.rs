//! Archive formats and the built-in archive backend.

pub mod cab;
pub mod common;
pub mod detect;
pub mod gzip;
pub mod sevenz;
pub mod tar;
pub mod traits;
pub mod zip;

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::ScanError;

pub use detect::FormatHint;
pub use traits::ArchiveEntry;
pub use traits::ArchiveProvider;

/// Pure-Rust archive backend.
///
/// Opens zip, 7z, tar, gz and cab. bz2 and xz are recognized by name but have
/// no codec here and fail with `ScanError::UnsupportedFormat`.
///
/// # Examples
///
/// ```no_run
/// use nestscan_core::ArchiveProvider;
/// use nestscan_core::FormatHint;
/// use nestscan_core::NativeProvider;
/// use std::path::Path;
///
/// let mut provider = NativeProvider::new();
/// for entry in provider.list_entries(Path::new("bundle.zip"), FormatHint::Zip)? {
///     println!("{} ({} bytes)", entry.name, entry.size);
/// }
/// # Ok::<(), nestscan_core::ScanError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeProvider;

impl NativeProvider {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveProvider for NativeProvider {
    fn list_entries(&mut self, archive: &Path, format: FormatHint) -> Result<Vec<ArchiveEntry>> {
        match format {
            FormatHint::Zip => zip::list_entries(archive),
            FormatHint::SevenZ => sevenz::list_entries(archive),
            FormatHint::Tar => tar::list_entries(archive),
            FormatHint::GZip => gzip::list_entries(archive),
            FormatHint::Cab => cab::list_entries(archive),
            FormatHint::BZip2 | FormatHint::Xz => Err(ScanError::UnsupportedFormat {
                hint: format.to_string(),
            }),
        }
    }

    fn extract_entry(
        &mut self,
        archive: &Path,
        format: FormatHint,
        index: usize,
        dest: &Path,
    ) -> Result<PathBuf> {
        match format {
            FormatHint::Zip => zip::extract_entry(archive, index, dest),
            FormatHint::SevenZ => sevenz::extract_entry(archive, index, dest),
            FormatHint::Tar => tar::extract_entry(archive, index, dest),
            FormatHint::GZip => gzip::extract_entry(archive, index, dest),
            FormatHint::Cab => cab::extract_entry(archive, index, dest),
            FormatHint::BZip2 | FormatHint::Xz => Err(ScanError::UnsupportedFormat {
                hint: format.to_string(),
            }),
        }
    }
}
