//! Tar listing and single-entry extraction.
//!
//! Tar headers carry no content checksum, so every entry is listed with an
//! unknown checksum. Links and special files are left out of the listing;
//! indices still refer to the raw header position.
//!
//! Entries are walked with a seeking reader, so reaching an entry reads the
//! headers before it but skips their data.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::ScanError;
use crate::checksum::Checksum;
use crate::formats::common;
use crate::formats::traits::ArchiveEntry;

fn open(archive_path: &Path) -> Result<tar::Archive<BufReader<File>>> {
    let file = File::open(archive_path)?;
    Ok(tar::Archive::new(BufReader::new(file)))
}

/// Lists regular files and directories in header order.
pub fn list_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut archive = open(archive_path)?;
    let entries = archive.entries_with_seek().map_err(|e| {
        common::invalid_archive(archive_path, format!("failed to read TAR entries: {e}"))
    })?;

    let mut listed = Vec::new();
    for (index, entry) in entries.enumerate() {
        let entry = entry.map_err(|e| {
            common::invalid_archive(archive_path, format!("failed to read TAR entry: {e}"))
        })?;
        let is_directory = match entry.header().entry_type() {
            tar::EntryType::Directory => true,
            tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
                false
            }
            _ => continue,
        };
        let path = entry.path().map_err(|e| {
            common::invalid_archive(archive_path, format!("invalid TAR entry path: {e}"))
        })?;
        listed.push(ArchiveEntry {
            index,
            name: common::normalize_name(&path.to_string_lossy()),
            size: entry.size(),
            is_directory,
            checksum: Checksum::UNKNOWN,
        });
    }

    Ok(listed)
}

/// Writes the entry at header position `index` below `dest`.
pub fn extract_entry(archive_path: &Path, index: usize, dest: &Path) -> Result<PathBuf> {
    let mut archive = open(archive_path)?;
    let mut entries = archive.entries_with_seek().map_err(|e| {
        common::invalid_archive(archive_path, format!("failed to read TAR entries: {e}"))
    })?;

    let mut entry = entries
        .nth(index)
        .ok_or(ScanError::EntryNotFound { index })?
        .map_err(|e| ScanError::Extraction {
            entry: format!("#{index}"),
            reason: e.to_string(),
        })?;
    let name = entry
        .path()
        .map_err(|e| ScanError::Extraction {
            entry: format!("#{index}"),
            reason: e.to_string(),
        })?
        .to_string_lossy()
        .into_owned();
    common::write_entry(&mut entry, dest, &name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path) -> PathBuf {
        let data = TarTestBuilder::new()
            .add_directory("nested/")
            .add_file("nested/file_1.txt", b"1")
            .add_symlink("link", "nested/file_1.txt")
            .add_file("file_2.txt", b"2")
            .build();
        let path = dir.join("fixture.tar");
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_list_skips_links() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(temp.path());

        let entries = list_entries(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_directory);
        let files: Vec<_> = entries
            .iter()
            .filter(|e| !e.is_directory)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(files, vec!["nested/file_1.txt", "file_2.txt"]);
        assert!(entries.iter().all(|e| !e.checksum.is_known()));
        // Raw header positions survive the filtering
        assert_eq!(entries[2].index, 3);
    }

    #[test]
    fn test_extract_by_header_index() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(temp.path());
        let out = TempDir::new().unwrap();

        let written = extract_entry(&path, 3, out.path()).unwrap();
        assert_eq!(written, out.path().join("file_2.txt"));
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "2");

        let written = extract_entry(&path, 1, out.path()).unwrap();
        assert_eq!(written, out.path().join("nested/file_1.txt"));
    }

    #[test]
    fn test_extract_past_end() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(temp.path());
        let out = TempDir::new().unwrap();

        assert!(matches!(
            extract_entry(&path, 10, out.path()),
            Err(ScanError::EntryNotFound { index: 10 })
        ));
    }

    #[test]
    fn test_extract_skips_large_preceding_entries() {
        let temp = TempDir::new().unwrap();
        let big = vec![b'x'; 300 * 1024];
        let data = (0..8)
            .fold(TarTestBuilder::new(), |builder, i| {
                builder.add_file(&format!("big_{i}.bin"), &big)
            })
            .add_file("last.txt", b"the end")
            .build();
        let path = temp.path().join("large.tar");
        std::fs::write(&path, data).unwrap();

        let entries = list_entries(&path).unwrap();
        assert_eq!(entries.len(), 9);
        assert_eq!(entries[3].size, 300 * 1024);

        // Out of order, so each call starts from a fresh reader
        for index in [8, 2, 0] {
            let out = TempDir::new().unwrap();
            let written = extract_entry(&path, index, out.path()).unwrap();
            let content = std::fs::read(&written).unwrap();
            if index == 8 {
                assert_eq!(content, b"the end");
            } else {
                assert_eq!(content, big);
            }
        }
    }
}
