//! Tracing subscriber setup
//!
//! Logs go to stderr so a dry run can pipe the rendered report from stdout.

use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose` when `RUST_LOG` is unset
const VERBOSE_FILTER: &str = "warn,stig_evidence=debug,stig_evidence_cli=debug";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|e| CliError::Logging {
            message: format!("Invalid log filter: {}", e),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|e| CliError::Logging {
            message: e.to_string(),
        })
}
