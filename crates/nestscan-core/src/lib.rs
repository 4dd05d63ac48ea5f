//! Recursive file scanner that descends into nested archives.
//!
//! `nestscan-core` walks a directory tree, opens every archive it meets
//! (zip, 7z, tar, gz/tgz, cab) and delivers each matching file, including
//! files nested several archives deep, to a consumer together with its
//! logical path such as `root/outer.zip/inner.tar/readme.txt`. Duplicate
//! content can be suppressed by CRC32.
//!
//! # Examples
//!
//! ```no_run
//! use nestscan_core::DeliveredFile;
//! use nestscan_core::ScanConfig;
//! use nestscan_core::Scanner;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::default()
//!     .with_include([r".*\.txt"])
//!     .with_verify_checksums(true);
//! let mut scanner = Scanner::new(config)?;
//!
//! let mut print = |file: &DeliveredFile<'_>| -> nestscan_core::Result<()> {
//!     println!("{} {}", file.checksum, file.logical.display());
//!     Ok(())
//! };
//! let report = scanner.scan("/data", &mut print)?;
//! println!("Processed {} files", report.files_delivered);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod checksum;
pub mod classifier;
pub mod config;
pub mod consumer;
pub mod error;
pub mod formats;
pub mod report;
pub mod scanner;
pub mod workspace;

#[doc(hidden)]
pub mod test_utils;

pub use checksum::Checksum;
pub use checksum::ChecksumSet;
pub use classifier::Classification;
pub use classifier::Classifier;
pub use config::ScanConfig;
pub use consumer::ArchiveAction;
pub use consumer::ArchiveConsumer;
pub use consumer::CollectedFile;
pub use consumer::DeliveredFile;
pub use consumer::FileCollector;
pub use consumer::FileConsumer;
pub use error::ErrorScope;
pub use error::Result;
pub use error::ScanError;
pub use formats::ArchiveEntry;
pub use formats::ArchiveProvider;
pub use formats::FormatHint;
pub use formats::NativeProvider;
pub use report::ScanIssue;
pub use report::ScanReport;
pub use scanner::Scanner;
