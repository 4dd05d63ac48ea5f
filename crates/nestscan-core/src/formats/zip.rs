//! ZIP listing and single-entry extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::ScanError;
use crate::checksum::Checksum;
use crate::formats::common;
use crate::formats::traits::ArchiveEntry;

fn open(archive_path: &Path) -> Result<zip::ZipArchive<BufReader<File>>> {
    let file = File::open(archive_path)?;
    zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| common::invalid_archive(archive_path, format!("failed to open ZIP archive: {e}")))
}

/// Lists all entries; the ZIP central directory supplies each CRC32.
pub fn list_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut archive = open(archive_path)?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(|e| {
            common::invalid_archive(archive_path, format!("failed to read ZIP entry: {e}"))
        })?;
        entries.push(ArchiveEntry {
            index,
            name: common::normalize_name(entry.name()),
            size: entry.size(),
            is_directory: entry.is_dir(),
            checksum: Checksum::new(entry.crc32()),
        });
    }

    Ok(entries)
}

/// Decompresses entry `index` below `dest`.
pub fn extract_entry(archive_path: &Path, index: usize, dest: &Path) -> Result<PathBuf> {
    let mut archive = open(archive_path)?;
    if index >= archive.len() {
        return Err(ScanError::EntryNotFound { index });
    }
    let mut entry = archive.by_index(index).map_err(|e| ScanError::Extraction {
        entry: format!("#{index}"),
        reason: e.to_string(),
    })?;
    let name = entry.name().to_string();
    common::write_entry(&mut entry, dest, &name)
}
