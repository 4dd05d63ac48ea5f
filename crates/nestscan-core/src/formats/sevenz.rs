//! 7z listing and single-entry extraction.
//!
//! sevenz-rust2 only decodes through a callback that visits entries in
//! stream order, so extraction walks the archive until it reaches the entry
//! whose name matches the listed index and stops there. Solid blocks have to
//! be decoded up to that entry anyway. Entries without a stream are written
//! without decoding anything.
//!
//! Encrypted archives are rejected as invalid.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use sevenz_rust2::Archive;
use sevenz_rust2::Password;

use crate::Result;
use crate::ScanError;
use crate::checksum::Checksum;
use crate::formats::common;
use crate::formats::traits::ArchiveEntry;

fn read_archive(archive_path: &Path) -> Result<Archive> {
    let mut source = BufReader::new(File::open(archive_path)?);
    Archive::read(&mut source, &Password::empty()).map_err(|e| {
        let err_str = e.to_string().to_lowercase();
        if err_str.contains("encrypt") || err_str.contains("password") {
            return common::invalid_archive(archive_path, "encrypted 7z archives are not supported");
        }
        common::invalid_archive(archive_path, format!("failed to open 7z archive: {e}"))
    })
}

/// CRC32 recorded in the 7z header, widened to `u64` by sevenz-rust2.
#[allow(clippy::cast_possible_truncation)]
fn stored_checksum(entry: &sevenz_rust2::ArchiveEntry) -> Checksum {
    if entry.has_crc {
        Checksum::new(entry.crc as u32)
    } else {
        Checksum::UNKNOWN
    }
}

/// Lists entries in header order with their stored CRC32 when present.
pub fn list_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let archive = read_archive(archive_path)?;
    Ok(archive
        .files
        .iter()
        .enumerate()
        .map(|(index, e)| ArchiveEntry {
            index,
            name: common::normalize_name(&e.name),
            size: e.size,
            is_directory: e.is_directory(),
            checksum: stored_checksum(e),
        })
        .collect())
}

/// Decodes the entry listed at `index` below `dest`.
pub fn extract_entry(archive_path: &Path, index: usize, dest: &Path) -> Result<PathBuf> {
    let (target, has_stream) = {
        let archive = read_archive(archive_path)?;
        let entry = archive
            .files
            .get(index)
            .ok_or(ScanError::EntryNotFound { index })?;
        if entry.is_directory() {
            return Err(ScanError::Extraction {
                entry: entry.name.clone(),
                reason: "entry is a directory".into(),
            });
        }
        (entry.name.clone(), entry.has_stream)
    };

    if !has_stream {
        return common::write_entry(&mut std::io::empty(), dest, &target);
    }

    let written: RefCell<Option<Result<PathBuf>>> = RefCell::new(None);
    let source = BufReader::new(File::open(archive_path)?);

    let extract_fn = |entry: &sevenz_rust2::ArchiveEntry,
                      reader: &mut dyn Read,
                      _dest_dir: &PathBuf|
     -> std::result::Result<bool, sevenz_rust2::Error> {
        if !entry.is_directory() && entry.name == target {
            *written.borrow_mut() = Some(common::write_entry(reader, dest, &target));
            return Ok(false);
        }
        // Keep the decoder in step with the stream
        std::io::copy(reader, &mut std::io::sink())
            .map_err(|e| sevenz_rust2::Error::Other(format!("skip failed: {e}").into()))?;
        Ok(true)
    };

    sevenz_rust2::decompress_with_extract_fn(source, dest, extract_fn).map_err(|e| {
        ScanError::Extraction {
            entry: target.clone(),
            reason: e.to_string(),
        }
    })?;

    written
        .into_inner()
        .unwrap_or(Err(ScanError::EntryNotFound { index }))
}
