//! Output formatter trait for scan results.

use anyhow::Result;
use nestscan_core::DeliveredFile;
use nestscan_core::ScanReport;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Called once per delivered file, while its physical path still exists
    fn format_file(&mut self, file: &DeliveredFile<'_>) -> Result<()>;

    /// Called once after all paths were scanned
    fn format_summary(&mut self, report: &ScanReport) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    /// Finished, but some entries or archives were skipped
    Partial,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn new(operation: impl Into<String>, status: Status, data: T) -> Self {
        Self {
            operation: operation.into(),
            status,
            data,
        }
    }
}
