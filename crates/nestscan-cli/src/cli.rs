//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nestscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files, archives or directories to scan
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Regular expression a file name must fully match
    ///
    /// Takes one pattern per flag; repeat it for several (`-f 'a.*' -f 'b.*'`).
    /// Patterns are never split on commas, so quantifiers like `{1,3}` work.
    #[arg(
        short = 'f',
        long = "filespec",
        value_name = "REGEX",
        default_value = ".*",
        action = clap::ArgAction::Append,
        num_args = 1
    )]
    pub filespec: Vec<String>,

    /// Regular expression that excludes matching file names
    ///
    /// Takes one pattern per flag, like `--filespec`.
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "REGEX",
        action = clap::ArgAction::Append,
        num_args = 1
    )]
    pub exclude: Vec<String>,

    /// Do not open archives
    #[arg(short = 'n', long = "nozip")]
    pub nozip: bool,

    /// Report each distinct content only once, by CRC32
    #[arg(short = 'c', long = "checkcrc")]
    pub checkcrc: bool,

    /// Directory for temporary extraction workspaces
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    /// Builds the scan configuration from the flags.
    pub fn scan_config(&self) -> nestscan_core::ScanConfig {
        let config = nestscan_core::ScanConfig::default()
            .with_include(self.filespec.iter().cloned())
            .with_skip_archives(self.nozip)
            .with_verify_checksums(self.checkcrc);
        let config = if self.exclude.is_empty() {
            config
        } else {
            config.with_exclude(self.exclude.iter().cloned())
        };
        match &self.temp_dir {
            Some(dir) => config.with_temp_root(dir),
            None => config,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["nestscan", "some/dir"]).unwrap();
        let config = cli.scan_config();
        assert_eq!(config.include_patterns, vec![".*".to_string()]);
        assert_eq!(config.exclude_patterns, vec![String::new()]);
        assert!(!config.skip_archives);
        assert!(!config.verify_checksums);
        assert!(config.temp_root.is_none());
    }

    #[test]
    fn test_repeated_patterns() {
        let cli = Cli::try_parse_from([
            "nestscan", "-f", r".*\.txt", "-f", r".*\.ini", "-e", "secret.*", "-n", "-c", "a", "b",
        ])
        .unwrap();
        assert_eq!(cli.paths.len(), 2);
        let config = cli.scan_config();
        assert_eq!(config.include_patterns.len(), 2);
        assert_eq!(config.exclude_patterns, vec!["secret.*".to_string()]);
        assert!(config.skip_archives);
        assert!(config.verify_checksums);
    }

    #[test]
    fn test_filespec_takes_one_pattern_per_flag() {
        let cli = Cli::try_parse_from(["nestscan", "-f", r"a\d{1,3}", "dir_b"]).unwrap();
        assert_eq!(cli.filespec, vec![r"a\d{1,3}".to_string()]);
        assert_eq!(cli.paths, vec![PathBuf::from("dir_b")]);
    }

    #[test]
    fn test_filespec_help_mentions_repetition() {
        use clap::CommandFactory;

        let mut cmd = Cli::command();
        let help = cmd.render_long_help().to_string();
        assert!(help.contains("repeat it for several"));
    }

    #[test]
    fn test_path_required() {
        assert!(Cli::try_parse_from(["nestscan"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["nestscan", "-v", "-q", "x"]).is_err());
    }
}
