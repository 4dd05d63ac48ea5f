//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use nestscan_core::DeliveredFile;
use nestscan_core::ScanReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }

    /// Lines printed for one delivered file.
    fn file_lines(&self, file: &DeliveredFile<'_>) -> Vec<String> {
        if self.quiet {
            return vec![file.logical.display().to_string()];
        }

        let mut logical = file.logical.display().to_string();
        if file.checksum.is_known() {
            logical = format!("{logical}  [crc32 {}]", file.checksum);
        }
        let mut lines = vec![file.physical.display().to_string(), logical];
        if self.verbose {
            lines.push(format!("  depth: {}", file.depth));
        }
        lines.push(String::new());
        lines
    }

    fn summary_lines(&self, report: &ScanReport) -> Vec<String> {
        let headline = format!(
            "Processed {} files",
            Self::format_number(report.files_delivered)
        );
        let mut lines = vec![if self.use_colors {
            format!("{} {headline}", style("✓").green().bold())
        } else {
            headline
        }];

        if report.duplicates_skipped > 0 {
            lines.push(format!(
                "  Duplicates skipped: {}",
                Self::format_number(report.duplicates_skipped)
            ));
        }
        lines.push(format!(
            "  Archives opened:    {}",
            Self::format_number(report.archives_opened)
        ));

        if report.has_errors() {
            let count = format!("  Errors:             {}", report.errors.len());
            lines.push(if self.use_colors {
                style(count).yellow().to_string()
            } else {
                count
            });
        }

        if self.verbose {
            lines.push(format!(
                "  Directories:        {}",
                Self::format_number(report.directories_visited)
            ));
            lines.push(format!(
                "  Entries extracted:  {}",
                Self::format_number(report.entries_extracted)
            ));
            lines.push(format!("  Duration:           {:?}", report.duration));
            for issue in &report.errors {
                lines.push(format!(
                    "  [{}] {}: {}",
                    issue.scope,
                    issue.path.display(),
                    issue.message
                ));
            }
        }
        lines
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_file(&mut self, file: &DeliveredFile<'_>) -> Result<()> {
        for line in self.file_lines(file) {
            self.term.write_line(&line)?;
        }
        Ok(())
    }

    fn format_summary(&mut self, report: &ScanReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        for line in self.summary_lines(report) {
            self.term.write_line(&line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestscan_core::Checksum;
    use nestscan_core::ScanError;
    use std::path::Path;

    fn plain(verbose: bool, quiet: bool) -> HumanFormatter {
        HumanFormatter {
            verbose,
            quiet,
            use_colors: false,
            term: Term::stdout(),
        }
    }

    fn sample_file(checksum: Checksum) -> DeliveredFile<'static> {
        DeliveredFile {
            physical: Path::new("/tmp/0a1b/inner.txt"),
            logical: Path::new("data/pack.zip/inner.txt"),
            checksum,
            depth: 1,
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_file_lines() {
        let lines = plain(false, false).file_lines(&sample_file(Checksum::new(0xcbf4_3926)));
        assert_eq!(lines[0], "/tmp/0a1b/inner.txt");
        assert_eq!(lines[1], "data/pack.zip/inner.txt  [crc32 cbf43926]");

        let lines = plain(false, false).file_lines(&sample_file(Checksum::UNKNOWN));
        assert_eq!(lines[1], "data/pack.zip/inner.txt");
    }

    #[test]
    fn test_quiet_prints_logical_only() {
        let lines = plain(false, true).file_lines(&sample_file(Checksum::new(1)));
        assert_eq!(lines, vec!["data/pack.zip/inner.txt".to_string()]);
    }

    #[test]
    fn test_summary_lists_errors_when_verbose() {
        let mut report = ScanReport {
            files_delivered: 1234,
            ..Default::default()
        };
        report.add_error("data/bad.zip", &ScanError::EntryNotFound { index: 2 });

        let lines = plain(true, false).summary_lines(&report);
        assert_eq!(lines[0], "Processed 1,234 files");
        assert!(lines.iter().any(|l| l.contains("Errors:") && l.ends_with('1')));
        assert!(lines.iter().any(|l| l.contains("[entry] data/bad.zip")));
    }
}
