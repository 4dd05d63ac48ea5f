//! Ephemeral extraction directories.
//!
//! Each archive entry is materialized into its own freshly created directory
//! and removed as soon as the entry (including any nested scan) is done.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use rand::Rng;

use crate::Result;

/// Length of generated directory names.
const NAME_LEN: usize = 16;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Generates a random lowercase hexadecimal name.
fn random_name<R: Rng>(rng: &mut R) -> String {
    (0..NAME_LEN)
        .map(|_| char::from(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())]))
        .collect()
}

/// Creates a directory under `base` whose path did not exist beforehand.
///
/// Names are regenerated until an unused one is found. Creation uses
/// `create_dir`, so a concurrent creator of the same name is detected and
/// another name is tried. The caller owns removal.
///
/// # Errors
///
/// Returns an I/O error if `base` is missing or not writable.
pub fn allocate_unique_dir(base: &Path) -> Result<PathBuf> {
    let mut rng = rand::thread_rng();
    loop {
        let candidate = base.join(random_name(&mut rng));
        if candidate.exists() {
            continue;
        }
        match std::fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }
    }
}

/// RAII guard for an extraction directory.
///
/// The directory and everything in it is removed on drop, so it is cleaned up
/// on both the success and the error path.
///
/// # Examples
///
/// ```
/// use nestscan_core::workspace::TempWorkspace;
///
/// let path = {
///     let ws = TempWorkspace::new(&std::env::temp_dir())?;
///     std::fs::write(ws.path().join("entry.txt"), b"data")?;
///     ws.path().to_path_buf()
/// };
/// assert!(!path.exists());
/// # Ok::<(), nestscan_core::ScanError>(())
/// ```
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
    removed: bool,
}

impl TempWorkspace {
    /// Allocates a fresh directory under `base`.
    pub fn new(base: &Path) -> Result<Self> {
        let path = allocate_unique_dir(base)?;
        tracing::trace!(path = %path.display(), "allocated workspace");
        Ok(Self {
            path,
            removed: false,
        })
    }

    /// Location of the workspace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the workspace now and reports any failure.
    pub fn cleanup(mut self) -> Result<()> {
        self.removed = true;
        remove(&self.path)
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        if !self.removed
            && let Err(e) = remove(&self.path)
        {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove workspace");
        }
    }
}

fn remove(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    #[test]
    fn test_random_name_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = random_name(&mut rng);
        assert_eq!(name.len(), NAME_LEN);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_allocate_creates_new_dir() {
        let base = TempDir::new().unwrap();
        let a = allocate_unique_dir(base.path()).unwrap();
        let b = allocate_unique_dir(base.path()).unwrap();
        assert!(a.is_dir());
        assert!(b.is_dir());
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(base.path()));
    }

    #[test]
    fn test_allocate_missing_base_fails() {
        let base = TempDir::new().unwrap();
        assert!(allocate_unique_dir(&base.path().join("missing")).is_err());
    }

    #[test]
    fn test_workspace_removed_on_drop() {
        let base = TempDir::new().unwrap();
        let path = {
            let ws = TempWorkspace::new(base.path()).unwrap();
            std::fs::create_dir_all(ws.path().join("nested/dir")).unwrap();
            std::fs::write(ws.path().join("nested/dir/file.txt"), b"x").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_explicit_cleanup() {
        let base = TempDir::new().unwrap();
        let ws = TempWorkspace::new(base.path()).unwrap();
        let path = ws.path().to_path_buf();
        ws.cleanup().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_cleanup_tolerates_missing_dir() {
        let base = TempDir::new().unwrap();
        let ws = TempWorkspace::new(base.path()).unwrap();
        std::fs::remove_dir(ws.path()).unwrap();
        assert!(ws.cleanup().is_ok());
    }
}
