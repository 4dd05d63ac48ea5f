//! Microsoft cabinet listing and single-entry extraction.
//!
//! Cabinets only checksum data blocks, not files, so entries are listed
//! with an unknown checksum. Indices run over all folders in order.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::ScanError;
use crate::checksum::Checksum;
use crate::formats::common;
use crate::formats::traits::ArchiveEntry;

fn open(archive_path: &Path) -> Result<cab::Cabinet<BufReader<File>>> {
    let file = File::open(archive_path)?;
    cab::Cabinet::new(BufReader::new(file)).map_err(|e| {
        common::invalid_archive(archive_path, format!("failed to open cabinet: {e}"))
    })
}

/// Lists files across all folders.
pub fn list_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let cabinet = open(archive_path)?;
    Ok(cabinet
        .folder_entries()
        .flat_map(cab::FolderEntry::file_entries)
        .enumerate()
        .map(|(index, file)| ArchiveEntry {
            index,
            name: common::normalize_name(file.name()),
            size: u64::from(file.uncompressed_size()),
            is_directory: false,
            checksum: Checksum::UNKNOWN,
        })
        .collect())
}

/// Decompresses the file at `index` below `dest`.
pub fn extract_entry(archive_path: &Path, index: usize, dest: &Path) -> Result<PathBuf> {
    let mut cabinet = open(archive_path)?;
    let raw_name = cabinet
        .folder_entries()
        .flat_map(cab::FolderEntry::file_entries)
        .nth(index)
        .map(|file| file.name().to_string())
        .ok_or(ScanError::EntryNotFound { index })?;

    let mut reader = cabinet
        .read_file(&raw_name)
        .map_err(|e| ScanError::Extraction {
            entry: raw_name.clone(),
            reason: e.to_string(),
        })?;
    common::write_entry(&mut reader, dest, &raw_name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_cab;
    use tempfile::TempDir;

    fn two_folder_cabinet(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("setup.cab");
        let data = create_test_cab(&[
            &[("readme.txt", b"stored readme"), ("bin/tool.dat", b"stored tool")],
            &[("docs\\guide.txt", b"compressed guide"), ("empty.log", b"")],
        ]);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_indices_span_folders() {
        let temp = TempDir::new().unwrap();
        let path = two_folder_cabinet(&temp);

        let entries = list_entries(&path).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["readme.txt", "bin/tool.dat", "docs/guide.txt", "empty.log"]
        );
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert!(!entry.is_directory);
            assert!(!entry.checksum.is_known());
        }
        assert_eq!(entries[2].size, 16);
        assert_eq!(entries[3].size, 0);
    }

    #[test]
    fn test_extract_from_each_folder() {
        let temp = TempDir::new().unwrap();
        let path = two_folder_cabinet(&temp);

        let out = TempDir::new().unwrap();
        let tool = extract_entry(&path, 1, out.path()).unwrap();
        assert_eq!(tool, out.path().join("bin/tool.dat"));
        assert_eq!(std::fs::read(&tool).unwrap(), b"stored tool");

        let out = TempDir::new().unwrap();
        let guide = extract_entry(&path, 2, out.path()).unwrap();
        assert_eq!(guide, out.path().join("docs/guide.txt"));
        assert_eq!(std::fs::read(&guide).unwrap(), b"compressed guide");

        assert!(matches!(
            extract_entry(&path, 4, out.path()),
            Err(ScanError::EntryNotFound { index: 4 })
        ));
    }

    #[test]
    fn test_not_a_cabinet() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.cab");
        std::fs::write(&path, b"this is not MSCF").unwrap();

        assert!(matches!(
            list_entries(&path),
            Err(ScanError::InvalidArchive { .. })
        ));
    }
}
