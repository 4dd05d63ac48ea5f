//! Fixture helpers for building archives and scan trees in tests.
//!
//! Everything here panics on I/O failure.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Builds an in-memory TAR archive from `(path, content)` pairs.
///
/// # Examples
///
/// ```
/// use nestscan_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// assert!(!tar_data.is_empty());
/// ```
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(TarTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Builds an in-memory ZIP archive from `(path, content)` pairs, stored
/// uncompressed.
///
/// # Examples
///
/// ```
/// use nestscan_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("file.txt", b"hello")]);
/// assert!(zip_data.starts_with(b"PK"));
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Gzip-compresses `data`, optionally recording `file_name` in the header.
#[must_use]
pub fn create_test_gzip(file_name: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut encoder = match file_name {
        Some(name) => flate2::GzBuilder::new()
            .filename(name)
            .write(Vec::new(), Compression::default()),
        None => GzEncoder::new(Vec::new(), Compression::default()),
    };
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builder for TAR fixtures.
///
/// # Examples
///
/// ```
/// use nestscan_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("dir/")
///     .add_file("dir/file.txt", b"content")
///     .add_symlink("link", "dir/file.txt")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates an empty archive builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.add_special(path, tar::EntryType::Directory, 0o755, None)
    }

    /// Adds a symlink entry pointing at `target`.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_special(path, tar::EntryType::Symlink, 0o777, Some(target))
    }

    fn add_special(
        mut self,
        path: &str,
        kind: tar::EntryType,
        mode: u32,
        link: Option<&str>,
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(mode);
        header.set_entry_type(kind);
        if let Some(target) = link {
            header.set_link_name(target).unwrap();
        }
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Finishes the archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for ZIP fixtures.
///
/// # Examples
///
/// ```
/// use nestscan_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_directory("dir/")
///     .add_file("dir/file.txt", b"content")
///     .add_deflated("big.txt", &[b'a'; 4096])
///     .build();
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates an empty archive builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored (uncompressed) file.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_with_method(path, data, zip::CompressionMethod::Stored)
    }

    /// Adds a deflate-compressed file.
    #[must_use]
    pub fn add_deflated(self, path: &str, data: &[u8]) -> Self {
        self.add_with_method(path, data, zip::CompressionMethod::Deflated)
    }

    fn add_with_method(mut self, path: &str, data: &[u8], method: zip::CompressionMethod) -> Self {
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Finishes the archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for 7z archives.
///
/// Empty files are stored without a data stream, the way 7-Zip writes them.
#[derive(Debug, Default)]
pub struct SevenZTestBuilder {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

impl SevenZTestBuilder {
    /// Creates an empty archive builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file entry.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        self.entries.push((path.to_string(), Some(data.to_vec())));
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        self.entries.push((path.to_string(), None));
        self
    }

    /// Compresses the entries into an archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut writer = sevenz_rust2::ArchiveWriter::new(Cursor::new(Vec::new())).unwrap();
        for (path, data) in self.entries {
            match data {
                Some(data) if !data.is_empty() => {
                    let entry = sevenz_rust2::ArchiveEntry::new_file(&path);
                    writer.push_archive_entry(entry, Some(data.as_slice())).unwrap();
                }
                Some(_) => {
                    let entry = sevenz_rust2::ArchiveEntry::new_file(&path);
                    writer.push_archive_entry::<&[u8]>(entry, None).unwrap();
                }
                None => {
                    let entry = sevenz_rust2::ArchiveEntry::new_directory(&path);
                    writer.push_archive_entry::<&[u8]>(entry, None).unwrap();
                }
            }
        }
        writer.finish().unwrap().into_inner()
    }
}

/// Builds a cabinet with one folder per slice of `(name, content)` pairs.
///
/// Folders alternate between stored and MSZIP compression.
#[must_use]
pub fn create_test_cab(folders: &[&[(&str, &[u8])]]) -> Vec<u8> {
    let mut builder = cab::CabinetBuilder::new();
    for (i, files) in folders.iter().enumerate() {
        let compression = if i % 2 == 0 {
            cab::CompressionType::None
        } else {
            cab::CompressionType::MsZip
        };
        let folder = builder.add_folder(compression);
        for (name, _) in *files {
            folder.add_file(*name);
        }
    }

    let mut contents = folders.iter().flat_map(|files| files.iter().map(|(_, data)| *data));
    let mut writer = builder.build(Cursor::new(Vec::new())).unwrap();
    while let Some(mut file) = writer.next_file().unwrap() {
        file.write_all(contents.next().unwrap()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Writes `data` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, data: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, data).unwrap();
    path
}

/// Counts the entries directly below `dir`.
#[must_use]
pub fn count_children(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_tar() {
        let tar_data = create_test_tar(vec![("file.txt", b"hello")]);
        let mut archive = tar::Archive::new(Cursor::new(tar_data));
        assert_eq!(archive.entries().unwrap().count(), 1);
    }

    #[test]
    fn test_zip_builder() {
        let zip_data = ZipTestBuilder::new()
            .add_directory("dir/")
            .add_file("dir/a.txt", b"a")
            .add_deflated("b.txt", b"bbbbbbbb")
            .build();
        let archive = zip::ZipArchive::new(Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 3);
    }

    #[test]
    fn test_gzip_round_trip() {
        use std::io::Read;

        let data = create_test_gzip(Some("name.txt"), b"payload");
        let mut decoder = flate2::read::GzDecoder::new(&data[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");
        assert_eq!(
            decoder.header().and_then(flate2::GzHeader::filename),
            Some(&b"name.txt"[..])
        );
    }

    #[test]
    fn test_write_file_creates_parents() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_file(temp.path(), "a/b/c.txt", b"x");
        assert!(path.is_file());
        assert_eq!(count_children(temp.path()), 1);
    }
}
