//! DISA CCI list resolution
//!
//! Maps each CCI item to the NIST 800-53 control indices it references for a
//! single revision. A CCI item typically cites the same control under several
//! revisions:
//!
//! ```xml
//! <cci_item id="CCI-000001">
//!   <references>
//!     <reference creator="NIST" title="NIST SP 800-53" version="3" index="AC-1 a" />
//!     <reference creator="NIST" title="NIST SP 800-53 Revision 4" version="4" index="AC-1 a 1" />
//!   </references>
//! </cci_item>
//! ```

use std::path::Path;

use tracing::{debug, warn};

use super::types::CciEvidenceMap;
use crate::error::{EvidenceError, Result};
use crate::xml::{self, Element};

/// DISA CCI list namespace
pub const CCI_NAMESPACE: &str = "http://iase.disa.mil/cci";

/// Prefix shared by every CCI identifier, e.g. `CCI-000366`
pub const CCI_ID_PREFIX: &str = "CCI-";

/// Parse a CCI document and map each CCI to its evidence for `revision`.
pub fn cci_to_evidence(path: impl AsRef<Path>, revision: &str) -> Result<CciEvidenceMap> {
    let path = path.as_ref();
    let root = xml::parse_file(path)?;
    debug!(path = %path.display(), root = %root.name, "parsed CCI document");
    resolve_evidence(&root, revision)
}

/// Map each `cci_item` of a parsed CCI list to its evidence indices.
///
/// Only references whose `version` attribute equals `revision` contribute;
/// all others are dropped. A qualifying reference must carry an `index`.
pub fn resolve_evidence(cci_list: &Element, revision: &str) -> Result<CciEvidenceMap> {
    let mut evidence = CciEvidenceMap::new();
    let mut discarded = 0usize;

    for items in cci_list.children_named(CCI_NAMESPACE, "cci_items") {
        for (position, item) in items.children_named(CCI_NAMESPACE, "cci_item").enumerate() {
            let cci = item.attr("id").ok_or_else(|| {
                EvidenceError::missing_attribute(
                    "cci_item",
                    "id",
                    format!("cci_item #{} of cci_items", position + 1),
                )
            })?;

            let mut indices = Vec::new();
            for references in item.children_named(CCI_NAMESPACE, "references") {
                for reference in &references.children {
                    if reference.attr("version") != Some(revision) {
                        discarded += 1;
                        continue;
                    }
                    let index = reference.attr("index").ok_or_else(|| {
                        EvidenceError::missing_attribute(
                            reference.name.as_str(),
                            "index",
                            format!("revision {} reference of {}", revision, cci),
                        )
                    })?;
                    indices.push(index.to_string());
                }
            }

            if evidence.insert(cci, indices).is_some() {
                warn!(cci, "duplicate cci_item id, later definition replaces earlier one");
            }
        }
    }

    debug!(
        cci_items = evidence.len(),
        evidence = evidence.value_count(),
        discarded,
        revision,
        "resolved CCI evidence"
    );
    Ok(evidence)
}
