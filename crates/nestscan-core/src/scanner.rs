//! Recursive scan over directories and nested archives.
//!
//! The scanner walks a directory tree depth first, classifies every
//! regular file by name and either delivers it to a [`FileConsumer`] or opens
//! it as an archive. Archive entries are extracted one by one into their own
//! workspace and dispatched exactly like files on disk, which is what makes
//! nested archives work.
//!
//! Errors are recovered at the smallest unit that can be skipped: a failing
//! directory entry or archive entry skips only itself, an archive that cannot
//! be listed skips only that archive. A missing root and a backend that fails
//! to initialize abort the scan.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use walkdir::DirEntry;
use walkdir::WalkDir;

use crate::Result;
use crate::ScanError;
use crate::checksum::Checksum;
use crate::checksum::ChecksumSet;
use crate::classifier::Classification;
use crate::classifier::Classifier;
use crate::config::ScanConfig;
use crate::consumer::ArchiveAction;
use crate::consumer::ArchiveConsumer;
use crate::consumer::DeliveredFile;
use crate::consumer::FileConsumer;
use crate::error::ErrorScope;
use crate::formats::ArchiveEntry;
use crate::formats::ArchiveProvider;
use crate::formats::FormatHint;
use crate::formats::NativeProvider;
use crate::report::ScanReport;
use crate::workspace::TempWorkspace;

/// Mutable state threaded through one scan call.
struct ScanContext<'s, 'c> {
    consumer: &'s mut (dyn FileConsumer + 'c),
    seen: &'s mut ChecksumSet,
    report: ScanReport,
    workspace_root: PathBuf,
}

impl ScanContext<'_, '_> {
    /// Logs and records a recovered error. Fatal errors are handed back.
    fn recover(&mut self, path: &Path, scope: ErrorScope, error: ScanError) -> Result<()> {
        if error.is_fatal() {
            return Err(error);
        }
        tracing::warn!(path = %path.display(), %scope, error = %error, "skipped after error");
        self.report.add_issue(path, scope, &error);
        Ok(())
    }
}

/// Scans directory trees and the archives inside them.
///
/// # Examples
///
/// ```no_run
/// use nestscan_core::FileCollector;
/// use nestscan_core::ScanConfig;
/// use nestscan_core::Scanner;
///
/// let config = ScanConfig::default().with_verify_checksums(true);
/// let mut scanner = Scanner::new(config)?;
/// let mut files = FileCollector::new();
/// let report = scanner.scan("/data/incoming", &mut files)?;
///
/// for file in files.files() {
///     println!("{} ({})", file.logical.display(), file.checksum);
/// }
/// println!("{} files, {} duplicates", report.files_delivered, report.duplicates_skipped);
/// # Ok::<(), nestscan_core::ScanError>(())
/// ```
pub struct Scanner<'a> {
    config: ScanConfig,
    classifier: Classifier,
    provider: Box<dyn ArchiveProvider + 'a>,
    archive_consumer: Option<&'a mut dyn ArchiveConsumer>,
    initialized: bool,
}

impl std::fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("has_archive_consumer", &self.archive_consumer.is_some())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl<'a> Scanner<'a> {
    /// Creates a scanner using the built-in archive backend.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidPattern` if an include or exclude pattern
    /// does not compile.
    pub fn new(config: ScanConfig) -> Result<Self> {
        let classifier = config.compile()?;
        Ok(Self {
            config,
            classifier,
            provider: Box::new(NativeProvider::new()),
            archive_consumer: None,
            initialized: false,
        })
    }

    /// Replaces the archive backend.
    #[must_use]
    pub fn with_provider(mut self, provider: Box<dyn ArchiveProvider + 'a>) -> Self {
        self.provider = provider;
        self.initialized = false;
        self
    }

    /// Installs a hook that runs before each archive is opened.
    #[must_use]
    pub fn with_archive_consumer(mut self, hook: &'a mut dyn ArchiveConsumer) -> Self {
        self.archive_consumer = Some(hook);
        self
    }

    /// Settings this scanner was built with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The compiled classifier.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Scans `root` with a fresh deduplication set.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::RootNotFound` if `root` does not exist and
    /// `ScanError::BackendUnavailable` if the archive backend fails to
    /// initialize. Every other error is recorded in the report.
    pub fn scan<P: AsRef<Path>>(
        &mut self,
        root: P,
        consumer: &mut dyn FileConsumer,
    ) -> Result<ScanReport> {
        let mut seen = ChecksumSet::new();
        self.scan_with_state(root, consumer, &mut seen)
    }

    /// Scans `root`, deduplicating against checksums from earlier scans.
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::scan`].
    pub fn scan_with_state<P: AsRef<Path>>(
        &mut self,
        root: P,
        consumer: &mut dyn FileConsumer,
        seen: &mut ChecksumSet,
    ) -> Result<ScanReport> {
        let root = root.as_ref();
        let start = Instant::now();

        let metadata = match fs::metadata(root) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScanError::RootNotFound {
                    path: root.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        self.ensure_initialized()?;

        tracing::info!(root = %root.display(), "scan started");
        let mut ctx = ScanContext {
            consumer,
            seen,
            report: ScanReport::new(),
            workspace_root: self.config.workspace_root(),
        };

        if metadata.is_dir() {
            self.walk_tree(&mut ctx, root)?;
        } else if let Err(e) = self.dispatch(&mut ctx, root, root, Checksum::UNKNOWN, 0) {
            let scope = e.scope();
            ctx.recover(root, scope, e)?;
        }

        let mut report = ctx.report;
        report.duration = start.elapsed();
        tracing::info!(
            root = %root.display(),
            delivered = report.files_delivered,
            duplicates = report.duplicates_skipped,
            archives = report.archives_opened,
            errors = report.errors.len(),
            "scan finished"
        );
        Ok(report)
    }

    fn ensure_initialized(&mut self) -> Result<()> {
        if self.config.skip_archives || self.initialized {
            return Ok(());
        }
        self.provider.initialize().map_err(|e| match e {
            ScanError::BackendUnavailable { .. } => e,
            other => ScanError::BackendUnavailable {
                reason: other.to_string(),
            },
        })?;
        self.initialized = true;
        Ok(())
    }

    fn walk_tree(&mut self, ctx: &mut ScanContext<'_, '_>, root: &Path) -> Result<()> {
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    let error =
                        ScanError::Io(std::io::Error::other(format!("walkdir error: {e}")));
                    ctx.recover(&path, ErrorScope::Entry, error)?;
                    continue;
                }
            };
            if let Err(e) = self.visit_entry(ctx, &entry) {
                let scope = e.scope();
                ctx.recover(entry.path(), scope, e)?;
            }
        }
        Ok(())
    }

    /// Handles one walked entry. Files directly under the root have depth 0.
    fn visit_entry(&mut self, ctx: &mut ScanContext<'_, '_>, entry: &DirEntry) -> Result<()> {
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ctx.report.directories_visited += 1;
            tracing::debug!(dir = %path.display(), depth = entry.depth(), "entering directory");
            return Ok(());
        }

        let is_file = if entry.path_is_symlink() {
            let target = fs::metadata(path)?;
            if target.is_dir() {
                tracing::debug!(path = %path.display(), "not following symlinked directory");
                return Ok(());
            }
            target.is_file()
        } else {
            file_type.is_file()
        };

        if !is_file {
            tracing::trace!(path = %path.display(), "not a regular file");
            return Ok(());
        }

        let depth = entry.depth().saturating_sub(1);
        self.dispatch(ctx, path, path, Checksum::UNKNOWN, depth)?;
        Ok(())
    }

    /// Classifies `logical` and delivers or opens the file at `physical`.
    ///
    /// Returns the checksum that was delivered, or `Checksum::UNKNOWN` when
    /// nothing was delivered or verification is off.
    fn dispatch(
        &mut self,
        ctx: &mut ScanContext<'_, '_>,
        physical: &Path,
        logical: &Path,
        known: Checksum,
        depth: usize,
    ) -> Result<Checksum> {
        match self.classifier.classify_path(logical) {
            Classification::Ignore => {
                tracing::trace!(path = %logical.display(), "ignored");
                Ok(Checksum::UNKNOWN)
            }
            Classification::DeliverFile => self.deliver(ctx, physical, logical, known, depth),
            Classification::OpenArchive(hint) => {
                self.process_archive(ctx, physical, logical, hint, depth)?;
                Ok(Checksum::UNKNOWN)
            }
        }
    }

    fn deliver(
        &mut self,
        ctx: &mut ScanContext<'_, '_>,
        physical: &Path,
        logical: &Path,
        known: Checksum,
        depth: usize,
    ) -> Result<Checksum> {
        let checksum = if self.config.verify_checksums {
            let crc = ChecksumSet::resolve(physical, known)?;
            if !ctx.seen.check_and_mark(crc) {
                ctx.report.duplicates_skipped += 1;
                tracing::debug!(path = %logical.display(), %crc, "duplicate content skipped");
                return Ok(Checksum::UNKNOWN);
            }
            crc
        } else {
            known
        };

        let file = DeliveredFile {
            physical,
            logical,
            checksum,
            depth,
        };
        ctx.consumer.on_file(&file).map_err(|e| match e {
            ScanError::Consumer { .. } => e,
            other => ScanError::consumer(logical, other),
        })?;
        ctx.report.files_delivered += 1;
        tracing::debug!(path = %logical.display(), depth, "delivered");
        Ok(checksum)
    }

    fn process_archive(
        &mut self,
        ctx: &mut ScanContext<'_, '_>,
        physical: &Path,
        logical: &Path,
        hint: FormatHint,
        depth: usize,
    ) -> Result<()> {
        if let Some(hook) = self.archive_consumer.as_deref_mut()
            && hook.on_archive_open(physical, logical, hint)? == ArchiveAction::Handled
        {
            tracing::debug!(archive = %logical.display(), "archive handled by consumer");
            return Ok(());
        }

        let entries = match self.provider.list_entries(physical, hint) {
            Ok(entries) => entries,
            Err(e) => return ctx.recover(logical, ErrorScope::Archive, e),
        };
        ctx.report.archives_opened += 1;
        tracing::info!(
            archive = %logical.display(),
            format = %hint,
            entries = entries.len(),
            depth,
            "opened archive"
        );

        for entry in entries.iter().filter(|e| !e.is_directory) {
            let entry_logical = logical.join(&entry.name);
            if self.classifier.classify(entry.file_name()) == Classification::Ignore {
                tracing::trace!(path = %entry_logical.display(), "ignored");
                continue;
            }
            if self.config.verify_checksums && ctx.seen.is_seen(entry.checksum) {
                ctx.report.duplicates_skipped += 1;
                tracing::debug!(path = %entry_logical.display(), "already processed");
                continue;
            }
            if let Err(e) =
                self.process_entry(ctx, physical, hint, entry, &entry_logical, depth + 1)
            {
                ctx.recover(&entry_logical, ErrorScope::Entry, e)?;
            }
        }
        Ok(())
    }

    /// Extracts one entry into its own workspace and dispatches it.
    ///
    /// The workspace is removed before returning, on both paths.
    fn process_entry(
        &mut self,
        ctx: &mut ScanContext<'_, '_>,
        archive: &Path,
        hint: FormatHint,
        entry: &ArchiveEntry,
        entry_logical: &Path,
        depth: usize,
    ) -> Result<()> {
        let workspace = TempWorkspace::new(&ctx.workspace_root)?;
        let outcome = self
            .provider
            .extract_entry(archive, hint, entry.index, workspace.path())
            .and_then(|extracted| {
                ctx.report.entries_extracted += 1;
                self.dispatch(ctx, &extracted, entry_logical, entry.checksum, depth)
            });
        let cleanup = workspace.cleanup();

        let checksum = outcome?;
        cleanup?;
        if self.config.verify_checksums {
            ctx.seen.mark_seen(checksum);
        }
        Ok(())
    }
}
