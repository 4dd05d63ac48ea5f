//! JSON output formatter for machine-readable results.
//!
//! Deliveries are buffered and written as one document with the summary.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::Status;
use anyhow::Result;
use nestscan_core::DeliveredFile;
use nestscan_core::ScanReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

#[derive(Debug, Serialize)]
struct FileRecord {
    physical: String,
    logical: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
    depth: usize,
}

#[derive(Debug, Serialize)]
struct IssueRecord {
    path: String,
    scope: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ScanOutput<'a> {
    files: &'a [FileRecord],
    files_delivered: usize,
    duplicates_skipped: usize,
    archives_opened: usize,
    directories_visited: usize,
    entries_extracted: usize,
    errors: Vec<IssueRecord>,
    duration_ms: u128,
}

#[derive(Default)]
pub struct JsonFormatter {
    files: Vec<FileRecord>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn document(&self, report: &ScanReport) -> JsonOutput<ScanOutput<'_>> {
        let data = ScanOutput {
            files: &self.files,
            files_delivered: report.files_delivered,
            duplicates_skipped: report.duplicates_skipped,
            archives_opened: report.archives_opened,
            directories_visited: report.directories_visited,
            entries_extracted: report.entries_extracted,
            errors: report
                .errors
                .iter()
                .map(|issue| IssueRecord {
                    path: issue.path.display().to_string(),
                    scope: issue.scope.to_string(),
                    message: issue.message.clone(),
                })
                .collect(),
            duration_ms: report.duration.as_millis(),
        };
        let status = if report.has_errors() {
            Status::Partial
        } else {
            Status::Success
        };
        JsonOutput::new("scan", status, data)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_file(&mut self, file: &DeliveredFile<'_>) -> Result<()> {
        self.files.push(FileRecord {
            physical: file.physical.display().to_string(),
            logical: file.logical.display().to_string(),
            checksum: file
                .checksum
                .is_known()
                .then(|| file.checksum.to_string()),
            depth: file.depth,
        });
        Ok(())
    }

    fn format_summary(&mut self, report: &ScanReport) -> Result<()> {
        Self::output(&self.document(report))
    }
}
