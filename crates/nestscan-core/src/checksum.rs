//! Content checksums and per-scan deduplication.
//!
//! Identity for deduplication is the CRC32 of the file content. Archive
//! metadata often carries that value already, so it is only computed when
//! unknown. Zero is reserved as "unknown" and never treated as a dedup key.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::Result;

/// Read size used when streaming a file through the CRC accumulator.
const CHUNK_SIZE: usize = 64 * 1024;

/// CRC32 of a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Checksum(u32);

impl Checksum {
    /// Sentinel for "not known yet".
    pub const UNKNOWN: Self = Self(0);

    /// Wraps a raw CRC32 value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw CRC32 value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` unless this is the zero sentinel.
    #[must_use]
    pub const fn is_known(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for Checksum {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Streams `path` through CRC32 in fixed-size chunks.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
///
/// # Examples
///
/// ```no_run
/// use nestscan_core::checksum::compute_crc32;
///
/// let crc = compute_crc32("data.bin")?;
/// println!("{crc}");
/// # Ok::<(), nestscan_core::ScanError>(())
/// ```
pub fn compute_crc32<P: AsRef<Path>>(path: P) -> Result<Checksum> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = crc32fast::Hasher::new();
    // Heap buffer: this runs deep inside the archive recursion
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Checksum(hasher.finalize()))
}

/// Set of checksums already delivered during one scan.
///
/// Grows monotonically: nothing is ever removed.
#[derive(Debug, Default)]
pub struct ChecksumSet {
    seen: HashSet<u32>,
}

impl ChecksumSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `known` if it is set, otherwise computes the file's CRC32.
    pub fn resolve(path: &Path, known: Checksum) -> Result<Checksum> {
        if known.is_known() {
            return Ok(known);
        }
        let crc = compute_crc32(path)?;
        tracing::debug!(path = %path.display(), crc = %crc, "computed checksum");
        Ok(crc)
    }

    /// Returns `true` if `checksum` was already delivered.
    ///
    /// The zero sentinel is never seen.
    pub fn is_seen(&self, checksum: Checksum) -> bool {
        checksum.is_known() && self.seen.contains(&checksum.0)
    }

    /// Records `checksum` as delivered. The zero sentinel is not recorded.
    pub fn mark_seen(&mut self, checksum: Checksum) {
        if checksum.is_known() {
            self.seen.insert(checksum.0);
        }
    }

    /// Marks `checksum` and returns `true` if it was new.
    ///
    /// A zero checksum always counts as new.
    pub fn check_and_mark(&mut self, checksum: Checksum) -> bool {
        if !checksum.is_known() {
            return true;
        }
        self.seen.insert(checksum.0)
    }

    /// Number of distinct checksums recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
