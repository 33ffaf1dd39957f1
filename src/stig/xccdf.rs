//! XCCDF STIG checklist extraction
//!
//! Reads the `Group` elements of a STIG benchmark and collects the CCI
//! identifiers each finding cites through its `ident` elements.

use std::path::Path;

use tracing::{debug, warn};

use super::types::FindingCciMap;
use crate::error::{EvidenceError, Result};
use crate::xml::{self, Element};

/// XCCDF 1.1 namespace used by DISA STIG benchmarks
pub const XCCDF_NAMESPACE: &str = "http://checklists.nist.gov/xccdf/1.1";

/// Parse a STIG document and map each VID to the CCIs it references.
pub fn retrieve_vids(path: impl AsRef<Path>) -> Result<FindingCciMap> {
    let path = path.as_ref();
    let root = xml::parse_file(path)?;
    debug!(path = %path.display(), root = %root.name, "parsed STIG document");
    extract_vids(&root)
}

/// Map each top-level `Group` of a parsed benchmark to its CCI list.
///
/// Every child of a Group is searched for direct `ident` children, so the
/// CCIs cited by the Group's rules are gathered together. A Group without
/// any `ident` keeps an empty list. When two Groups share an `id`, the later
/// one replaces the earlier.
pub fn extract_vids(benchmark: &Element) -> Result<FindingCciMap> {
    let mut findings = FindingCciMap::new();

    for (position, group) in benchmark
        .children_named(XCCDF_NAMESPACE, "Group")
        .enumerate()
    {
        let vid = group.attr("id").ok_or_else(|| {
            EvidenceError::missing_attribute(
                "Group",
                "id",
                format!("Group #{} of the benchmark", position + 1),
            )
        })?;

        let ccis: Vec<String> = group
            .children
            .iter()
            .flat_map(|child| child.children_named(XCCDF_NAMESPACE, "ident"))
            .map(|ident| ident.text.clone())
            .collect();

        if findings.insert(vid, ccis).is_some() {
            warn!(vid, "duplicate Group id, later definition replaces earlier one");
        }
    }

    debug!(
        findings = findings.len(),
        idents = findings.value_count(),
        "extracted STIG findings"
    );
    Ok(findings)
}
