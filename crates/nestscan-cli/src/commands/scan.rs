//! Scan command implementation

use crate::cli::Cli;
use crate::error::convert_scan_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use nestscan_core::ChecksumSet;
use nestscan_core::DeliveredFile;
use nestscan_core::ScanError;
use nestscan_core::ScanReport;
use nestscan_core::Scanner;

/// Scans every path in order, sharing one checksum set across them.
pub fn execute(cli: &Cli, formatter: &mut dyn OutputFormatter) -> Result<()> {
    let mut scanner = Scanner::new(cli.scan_config()).map_err(|e| convert_scan_error(e, None))?;

    let mut seen = ChecksumSet::new();
    let mut total = ScanReport::new();

    for path in &cli.paths {
        let mut deliver = |file: &DeliveredFile<'_>| -> nestscan_core::Result<()> {
            formatter
                .format_file(file)
                .map_err(|e| ScanError::consumer(file.logical, e))
        };
        let report = scanner
            .scan_with_state(path, &mut deliver, &mut seen)
            .map_err(|e| convert_scan_error(e, Some(path.as_path())))?;
        total.merge(report);
    }

    formatter.format_summary(&total)
}
