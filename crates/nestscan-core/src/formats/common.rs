//! Helpers shared by the native codecs.

use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::ScanError;

/// Normalizes an archive entry name to `/` separators.
pub fn normalize_name(name: &str) -> String {
    name.replace('\\', "/")
}

/// Converts an entry name into a relative path that stays inside the
/// extraction directory.
///
/// # Errors
///
/// Returns `ScanError::Extraction` for absolute paths, `..` components or
/// names with no file component.
pub fn safe_relative_path(name: &str) -> Result<PathBuf> {
    let normalized = normalize_name(name);
    let mut out = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ScanError::Extraction {
                    entry: name.to_string(),
                    reason: "entry path escapes the extraction directory".into(),
                });
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(ScanError::Extraction {
            entry: name.to_string(),
            reason: "entry has an empty path".into(),
        });
    }
    Ok(out)
}

/// Copies `reader` to `dest/<name>`, creating parent directories.
///
/// Returns the path of the written file.
pub fn write_entry<R: Read + ?Sized>(reader: &mut R, dest: &Path, name: &str) -> Result<PathBuf> {
    let output_path = dest.join(safe_relative_path(name)?);
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(&output_path)?);
    std::io::copy(reader, &mut writer).map_err(|e| ScanError::Extraction {
        entry: name.to_string(),
        reason: e.to_string(),
    })?;
    writer.flush()?;
    Ok(output_path)
}

/// Wraps a codec error for an archive that failed to open or list.
pub fn invalid_archive(path: &Path, reason: impl std::fmt::Display) -> ScanError {
    ScanError::InvalidArchive {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_relative_path() {
        assert_eq!(
            safe_relative_path("dir/file.txt").unwrap(),
            PathBuf::from("dir/file.txt")
        );
        assert_eq!(
            safe_relative_path("dir\\sub\\file.txt").unwrap(),
            PathBuf::from("dir/sub/file.txt")
        );
        assert_eq!(
            safe_relative_path("./file.txt").unwrap(),
            PathBuf::from("file.txt")
        );
    }

    #[test]
    fn test_safe_relative_path_rejects_escape() {
        assert!(safe_relative_path("../etc/passwd").is_err());
        assert!(safe_relative_path("/etc/passwd").is_err());
        assert!(safe_relative_path("").is_err());
        assert!(safe_relative_path(".").is_err());
    }

    #[test]
    fn test_write_entry_creates_parents() {
        let temp = TempDir::new().unwrap();
        let mut data: &[u8] = b"payload";
        let path = write_entry(&mut data, temp.path(), "a/b/c.txt").unwrap();
        assert_eq!(path, temp.path().join("a/b/c.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }
}
