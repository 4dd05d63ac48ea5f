//! Gzip streams presented as single-entry archives.
//!
//! The entry is named after the original file name stored in the gzip header
//! when present, otherwise after the archive with `.gz` stripped (`.tgz`
//! becomes `.tar`, so compressed tarballs are scanned as nested archives).
//!
//! A stream may hold several members back to back (`cat a.gz b.gz`). The
//! entry is their concatenation, so the last trailer's CRC32 and ISIZE only
//! describe part of it. Listing decodes every member instead and reports the
//! size and checksum of the whole output.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use flate2::bufread;
use flate2::read::GzDecoder;
use flate2::read::MultiGzDecoder;

use crate::Result;
use crate::ScanError;
use crate::checksum::Checksum;
use crate::formats::common;
use crate::formats::traits::ArchiveEntry;

const CHUNK_SIZE: usize = 64 * 1024;

/// Decompressed size and CRC32 of all members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamSummary {
    checksum: Checksum,
    size: u64,
    members: usize,
}

fn summarize(archive_path: &Path) -> Result<StreamSummary> {
    let mut reader = BufReader::new(File::open(archive_path)?);
    let mut hasher = crc32fast::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut size = 0u64;
    let mut members = 0;

    while !reader.fill_buf()?.is_empty() {
        let mut decoder = bufread::GzDecoder::new(&mut reader);
        loop {
            let n = decoder
                .read(&mut buffer)
                .map_err(|e| common::invalid_archive(archive_path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
            size += n as u64;
        }
        members += 1;
    }

    if members == 0 {
        return Err(common::invalid_archive(archive_path, "empty gzip stream"));
    }
    Ok(StreamSummary {
        checksum: Checksum::new(hasher.finalize()),
        size,
        members,
    })
}

/// Derives the entry name from the archive's own file name.
fn derived_name(archive_path: &Path) -> String {
    let name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".tgz") {
        format!("{}.tar", &name[..name.len() - 4])
    } else if lower.ends_with(".gz") && name.len() > 3 {
        name[..name.len() - 3].to_string()
    } else {
        format!("{name}.out")
    }
}

fn entry_name(archive_path: &Path) -> Result<String> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let stored = decoder
        .header()
        .ok_or_else(|| common::invalid_archive(archive_path, "invalid gzip header"))?
        .filename()
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .map(|raw| common::normalize_name(&raw))
        .and_then(|raw| raw.rsplit('/').next().map(str::to_string))
        .filter(|n| !n.is_empty() && n != "." && n != "..");
    Ok(stored.unwrap_or_else(|| derived_name(archive_path)))
}

/// Lists the single decompressed entry.
pub fn list_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let name = entry_name(archive_path)?;
    let summary = summarize(archive_path)?;
    if summary.members > 1 {
        tracing::debug!(
            archive = %archive_path.display(),
            members = summary.members,
            "multi-member gzip stream"
        );
    }
    Ok(vec![ArchiveEntry {
        index: 0,
        name,
        size: summary.size,
        is_directory: false,
        checksum: summary.checksum,
    }])
}

/// Decompresses the stream below `dest`.
pub fn extract_entry(archive_path: &Path, index: usize, dest: &Path) -> Result<PathBuf> {
    if index != 0 {
        return Err(ScanError::EntryNotFound { index });
    }
    let name = entry_name(archive_path)?;
    let file = File::open(archive_path)?;
    let mut decoder = MultiGzDecoder::new(BufReader::new(file));
    common::write_entry(&mut decoder, dest, &name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::GzBuilder;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(derived_name(Path::new("dir/notes.txt.gz")), "notes.txt");
        assert_eq!(derived_name(Path::new("bundle.TGZ")), "bundle.tar");
        assert_eq!(derived_name(Path::new("a.tar.gz")), "a.tar");
        assert_eq!(derived_name(Path::new(".gz")), ".gz.out");
    }

    #[test]
    fn test_list_reports_size_and_crc() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file_3.txt.gz");
        std::fs::write(&path, gzip(b"content 3")).unwrap();

        let entries = list_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "file_3.txt");
        assert_eq!(entries[0].size, 9);
        assert_eq!(entries[0].checksum.value(), crc32fast::hash(b"content 3"));
    }

    #[test]
    fn test_header_file_name_wins() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("renamed.gz");
        let mut encoder = GzBuilder::new()
            .filename("original.txt")
            .write(Vec::new(), Compression::default());
        encoder.write_all(b"x").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let entries = list_entries(&path).unwrap();
        assert_eq!(entries[0].name, "original.txt");
    }

    #[test]
    fn test_extract() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.tgz");
        std::fs::write(&path, gzip(b"tarball bytes")).unwrap();
        let out = TempDir::new().unwrap();

        let written = extract_entry(&path, 0, out.path()).unwrap();
        assert_eq!(written, out.path().join("data.tar"));
        assert_eq!(std::fs::read(&written).unwrap(), b"tarball bytes");
        assert!(matches!(
            extract_entry(&path, 1, out.path()),
            Err(ScanError::EntryNotFound { index: 1 })
        ));
    }

    #[test]
    fn test_multi_member_stream() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("joined.txt.gz");
        let mut joined = gzip(b"AAA");
        joined.extend_from_slice(&gzip(b"BBB"));
        std::fs::write(&path, joined).unwrap();

        let summary = summarize(&path).unwrap();
        assert_eq!(summary.members, 2);

        let entries = list_entries(&path).unwrap();
        assert_eq!(entries[0].size, 6);
        assert_eq!(entries[0].checksum.value(), crc32fast::hash(b"AAABBB"));
        assert_ne!(entries[0].checksum.value(), crc32fast::hash(b"BBB"));

        let out = TempDir::new().unwrap();
        let written = extract_entry(&path, 0, out.path()).unwrap();
        assert_eq!(std::fs::read(written).unwrap(), b"AAABBB");
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("padded.gz");
        let mut data = gzip(b"body");
        data.extend_from_slice(b"not gzip");
        std::fs::write(&path, data).unwrap();

        assert!(matches!(
            list_entries(&path),
            Err(ScanError::InvalidArchive { .. })
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("short.gz");
        std::fs::write(&path, [0x1f, 0x8b]).unwrap();

        assert!(list_entries(&path).is_err());
    }
}
