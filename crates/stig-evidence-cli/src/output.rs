//! Output formatting and display utilities
//!
//! Status lines go to stderr; stdout is reserved for rendered reports and
//! JSON summaries.

use colored::Colorize;
use std::path::Path;

use stig_evidence::EvidenceStats;

/// Unresolved CCIs listed before the list is truncated
const MAX_UNRESOLVED_SHOWN: usize = 10;

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a subheader
pub fn subheader(msg: &str) {
    eprintln!("\n{}", msg.bold());
}

/// Print the CLI banner
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("{}", format!("STIG Evidence v{}", version).bold());
    eprintln!("{}", "STIG → CCI → NIST 800-53 evidence cross-reference".dimmed());
}

/// Print the statistics of a completed run
pub fn print_summary(stats: &EvidenceStats, output_path: &Path) {
    subheader("Summary:");
    for line in stats.to_string().lines() {
        eprintln!("  {}", line);
    }

    if !stats.unresolved_ccis.is_empty() {
        print_unresolved(&stats.unresolved_ccis);
    }

    eprintln!();
    if stats.findings_with_evidence == 0 {
        warning("No finding resolved to any evidence control");
    }
    success(&format!(
        "Wrote {} finding(s) to {}",
        stats.findings_with_evidence,
        output_path.display()
    ));
}

/// Print cited CCIs that have no evidence for the selected revision
pub fn print_unresolved(ccis: &[String]) {
    subheader("CCIs without evidence:");
    for cci in ccis.iter().take(MAX_UNRESOLVED_SHOWN) {
        eprintln!("  {} {}", "·".yellow(), cci.dimmed());
    }
    if ccis.len() > MAX_UNRESOLVED_SHOWN {
        eprintln!(
            "  {}",
            format!("… and {} more", ccis.len() - MAX_UNRESOLVED_SHOWN).dimmed()
        );
    }
}

/// Print a JSON value to stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
