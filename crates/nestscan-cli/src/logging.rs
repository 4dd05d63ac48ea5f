//! Diagnostic logging to stderr.
//!
//! `RUST_LOG` wins when set; otherwise `--verbose` selects debug and
//! `--quiet` selects error. Stdout stays reserved for scan results.

use tracing_subscriber::EnvFilter;

fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "nestscan_core=debug,nestscan=debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // A subscriber installed earlier stays in place
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, true), "error");
        assert_eq!(default_directive(true, false), "nestscan_core=debug,nestscan=debug");
        assert_eq!(default_directive(false, false), "warn");
    }

    #[test]
    fn test_init_twice_keeps_first_subscriber() {
        init(false, false);
        init(true, false);
        tracing::debug!("still logging after a second init");
    }
}
