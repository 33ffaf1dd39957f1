//! STIG → CCI → NIST 800-53 evidence pipeline
//!
//! # Overview
//!
//! A DISA STIG benchmark lists findings (`Group` elements keyed by VID), and
//! each finding cites Control Correlation Identifiers through `ident`
//! elements. The DISA CCI list maps every CCI to NIST SP 800-53 control
//! indices across several revisions. Joining the two answers which controls
//! a finding provides evidence for.
//!
//! The pipeline has three stages:
//!
//! - [`xccdf`]: VID → CCIs from the STIG benchmark
//! - [`cci`]: CCI → evidence indices for one revision (Rev. 4 by default)
//! - [`composer`]: VID → evidence, serialized by [`report`]
//!
//! # Usage
//!
//! ```ignore
//! use stig_evidence::stig::{cci, composer, xccdf};
//!
//! let findings = xccdf::retrieve_vids("U_Apache_2-4_STIG_V2R3_Manual-xccdf.xml")?;
//! let evidence = cci::cci_to_evidence("U_CCI_List.xml", "4")?;
//! let report = composer::compose(&findings, &evidence);
//!
//! for (vid, controls) in report.evidence.iter() {
//!     println!("{}: {}", vid, controls.join(", "));
//! }
//! ```
//!
//! # Data Sources
//!
//! - STIG benchmarks: <https://public.cyber.mil/stigs/downloads/>
//! - CCI list: `U_CCI_List.xml` from the DISA CCI download

pub mod cci;
pub mod composer;
pub mod report;
pub mod xccdf;

mod types;

pub use composer::{EvidenceReport, EvidenceStats};
pub use types::{CciEvidenceMap, FindingCciMap, FindingEvidenceMap, IdentifierMap};
