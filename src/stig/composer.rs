//! VID → evidence composition
//!
//! Joins the finding map with the CCI evidence map. A VID only enters the
//! result once one of its CCIs contributes evidence, so findings whose CCIs
//! never resolve (or that cite no CCIs at all) are left out of the report.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use super::cci::{cci_to_evidence, CCI_ID_PREFIX};
use super::types::{CciEvidenceMap, FindingCciMap, FindingEvidenceMap};
use super::xccdf::retrieve_vids;
use crate::config::EvidenceConfig;
use crate::error::Result;

/// Result of joining a STIG with a CCI list
#[derive(Debug, Clone)]
pub struct EvidenceReport {
    /// Evidence per VID, in order of first contribution
    pub evidence: FindingEvidenceMap,

    /// Counters describing the join
    pub stats: EvidenceStats,
}

/// Statistics about a composed report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvidenceStats {
    /// VIDs extracted from the STIG
    pub findings: usize,
    /// VIDs that cite no CCI at all
    pub findings_without_ccis: usize,
    /// VIDs present in the report
    pub findings_with_evidence: usize,
    /// CCI citations across all VIDs, duplicates included
    pub cci_references: usize,
    /// Non-CCI idents (legacy V-/SV- ids) across all VIDs
    pub other_identifiers: usize,
    /// CCI items defined in the CCI list
    pub cci_items: usize,
    /// CCI citations that contributed evidence
    pub resolved_references: usize,
    /// Distinct cited CCIs with no evidence, in first-seen order
    pub unresolved_ccis: Vec<String>,
    /// Evidence entries in the report, duplicates included
    pub evidence_entries: usize,
}

impl fmt::Display for EvidenceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Findings:              {}", self.findings)?;
        writeln!(f, "  With evidence:       {}", self.findings_with_evidence)?;
        writeln!(f, "  Without CCIs:        {}", self.findings_without_ccis)?;
        writeln!(f, "CCI References:        {}", self.cci_references)?;
        writeln!(f, "  Resolved:            {}", self.resolved_references)?;
        writeln!(f, "  Unresolved CCIs:     {}", self.unresolved_ccis.len())?;
        writeln!(f, "Other Identifiers:     {}", self.other_identifiers)?;
        writeln!(f, "CCI Items Loaded:      {}", self.cci_items)?;
        writeln!(f, "Evidence Entries:      {}", self.evidence_entries)?;
        Ok(())
    }
}

/// Join VID → CCI with CCI → evidence.
///
/// For each VID in order, each cited CCI's evidence list is appended to the
/// VID's accumulator. Missing or empty lookups contribute nothing. Evidence
/// is neither sorted nor de-duplicated.
///
/// Every ident takes part in the join, but only `CCI-` identifiers count
/// towards the CCI statistics. Legacy V-/SV- idents are tallied separately.
pub fn compose(findings: &FindingCciMap, cci_evidence: &CciEvidenceMap) -> EvidenceReport {
    let mut evidence = FindingEvidenceMap::new();
    let mut stats = EvidenceStats {
        findings: findings.len(),
        cci_items: cci_evidence.len(),
        ..Default::default()
    };
    let mut unresolved_seen = HashSet::new();

    for (vid, ccis) in findings.iter() {
        if ccis.is_empty() {
            stats.findings_without_ccis += 1;
        }
        for cci in ccis {
            let is_cci = cci.starts_with(CCI_ID_PREFIX);
            if is_cci {
                stats.cci_references += 1;
            } else {
                stats.other_identifiers += 1;
            }
            match cci_evidence.get(cci) {
                Some(indices) if !indices.is_empty() => {
                    stats.resolved_references += 1;
                    evidence.extend(vid, indices);
                }
                _ => {
                    if is_cci && unresolved_seen.insert(cci.as_str()) {
                        stats.unresolved_ccis.push(cci.clone());
                    }
                }
            }
        }
    }

    stats.findings_with_evidence = evidence.len();
    stats.evidence_entries = evidence.value_count();

    if !stats.unresolved_ccis.is_empty() {
        warn!(
            count = stats.unresolved_ccis.len(),
            unresolved = ?stats.unresolved_ccis,
            "cited CCIs without evidence"
        );
    }

    EvidenceReport { evidence, stats }
}

/// Run the full pipeline for a configuration: extract, resolve, and join.
pub fn vid_with_evidence(config: &EvidenceConfig) -> Result<EvidenceReport> {
    let findings = retrieve_vids(&config.stig_path)?;
    info!(
        path = %config.stig_path.display(),
        findings = findings.len(),
        "loaded STIG findings"
    );

    let cci_evidence = cci_to_evidence(&config.cci_path, &config.revision)?;
    info!(
        path = %config.cci_path.display(),
        cci_items = cci_evidence.len(),
        revision = %config.revision,
        "loaded CCI evidence"
    );

    let report = compose(&findings, &cci_evidence);
    info!(
        findings_with_evidence = report.stats.findings_with_evidence,
        evidence_entries = report.stats.evidence_entries,
        "composed evidence report"
    );
    Ok(report)
}
