//! # STIG Evidence
//!
//! Cross-references DISA STIG findings with NIST 800-53 evidence controls.
//!
//! A STIG benchmark cites Control Correlation Identifiers (CCIs) for each
//! finding, and the DISA CCI list maps each CCI to NIST SP 800-53 control
//! indices. This crate joins the two into a per-finding evidence report.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stig_evidence::EvidenceConfig;
//!
//! let config = EvidenceConfig::builder()
//!     .stig_path("U_Apache_2-4_STIG_V2R3_Manual-xccdf.xml")
//!     .cci_path("U_CCI_List.xml")
//!     .output_name("apache")
//!     .build();
//!
//! let run = stig_evidence::run(&config)?;
//! println!("wrote {}", run.output_path.display());
//! ```
//!
//! ## Output
//!
//! ```xml
//! <Root>
//!   <V-ID>V-214228<Evidence>AC-10</Evidence></V-ID>
//! </Root>
//! ```

mod config;
mod error;
pub mod stig;
pub mod xml;

use std::path::PathBuf;

pub use config::{
    EvidenceConfig, EvidenceConfigBuilder, OutputFormat, TextPlacement, DEFAULT_OUTPUT_NAME,
    DEFAULT_REVISION,
};
pub use error::{EvidenceError, Result};
pub use stig::{EvidenceReport, EvidenceStats};

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct EvidenceRun {
    /// The composed report
    pub report: EvidenceReport,
    /// Where the report was written
    pub output_path: PathBuf,
}

/// Extract, join, and compose without writing anything.
pub fn build_report(config: &EvidenceConfig) -> Result<EvidenceReport> {
    config.validate()?;
    stig::composer::vid_with_evidence(config)
}

/// Run the whole pipeline and write the report to `config.output_path()`.
///
/// The output file is only created after both inputs have been parsed and
/// the document has been rendered in full.
pub fn run(config: &EvidenceConfig) -> Result<EvidenceRun> {
    let report = build_report(config)?;
    let output_path = stig::report::results_format(&report, config)?;
    Ok(EvidenceRun {
        report,
        output_path,
    })
}
