//! Report serialization
//!
//! Renders a composed [`EvidenceReport`] as XML or JSON and writes it out.
//! The whole document is rendered in memory first, so a failure never leaves
//! a partial file behind.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use tracing::info;

use super::composer::EvidenceReport;
use super::types::FindingEvidenceMap;
use crate::config::{EvidenceConfig, OutputFormat, TextPlacement};
use crate::error::{EvidenceError, Result};

/// Root element of the XML report
pub const ROOT_ELEMENT: &str = "Root";
/// Element carrying one VID
pub const VID_ELEMENT: &str = "V-ID";
/// Element carrying one evidence index
pub const EVIDENCE_ELEMENT: &str = "Evidence";
/// Attribute name used by [`TextPlacement::Attribute`]
pub const TEXT_ATTRIBUTE: &str = "text";

/// One VID entry of the JSON report
#[derive(Debug, Serialize)]
struct JsonFinding<'a> {
    vid: &'a str,
    evidence: &'a [String],
}

/// Render the report in the configured format
pub fn render(report: &EvidenceReport, config: &EvidenceConfig) -> Result<Vec<u8>> {
    match config.format {
        OutputFormat::Xml => render_xml(&report.evidence, config.text_placement, config.pretty),
        OutputFormat::Json => render_json(&report.evidence),
    }
}

/// Render the `Root` / `V-ID` / `Evidence` document.
///
/// `pretty` indents by two spaces; see [`EvidenceConfig::pretty`] for how that
/// interacts with `content` placement.
pub fn render_xml(
    evidence: &FindingEvidenceMap,
    placement: TextPlacement,
    pretty: bool,
) -> Result<Vec<u8>> {
    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    if evidence.is_empty() {
        write(&mut writer, Event::Empty(BytesStart::new(ROOT_ELEMENT)))?;
    } else {
        write(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
        for (vid, indices) in evidence.iter() {
            write_finding(&mut writer, vid, indices, placement)?;
        }
        write(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    }

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_finding(
    writer: &mut Writer<Vec<u8>>,
    vid: &str,
    indices: &[String],
    placement: TextPlacement,
) -> Result<()> {
    match placement {
        TextPlacement::Content => {
            write(writer, Event::Start(BytesStart::new(VID_ELEMENT)))?;
            write(writer, Event::Text(BytesText::new(vid)))?;
            for index in indices {
                write(writer, Event::Start(BytesStart::new(EVIDENCE_ELEMENT)))?;
                write(writer, Event::Text(BytesText::new(index)))?;
                write(writer, Event::End(BytesEnd::new(EVIDENCE_ELEMENT)))?;
            }
            write(writer, Event::End(BytesEnd::new(VID_ELEMENT)))?;
        }
        TextPlacement::Attribute => {
            let start = BytesStart::new(VID_ELEMENT).with_attributes([(TEXT_ATTRIBUTE, vid)]);
            if indices.is_empty() {
                write(writer, Event::Empty(start))?;
                return Ok(());
            }
            write(writer, Event::Start(start))?;
            for index in indices {
                let evidence = BytesStart::new(EVIDENCE_ELEMENT)
                    .with_attributes([(TEXT_ATTRIBUTE, index.as_str())]);
                write(writer, Event::Empty(evidence))?;
            }
            write(writer, Event::End(BytesEnd::new(VID_ELEMENT)))?;
        }
    }
    Ok(())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| EvidenceError::Serialize {
            message: e.to_string(),
        })
}

/// Render an ordered JSON array of `{ "vid", "evidence" }` objects
pub fn render_json(evidence: &FindingEvidenceMap) -> Result<Vec<u8>> {
    let findings: Vec<JsonFinding<'_>> = evidence
        .iter()
        .map(|(vid, evidence)| JsonFinding { vid, evidence })
        .collect();
    let mut bytes = serde_json::to_vec_pretty(&findings)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write rendered bytes to `path` in a single call
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| EvidenceError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Render the report and write it to the configured output path
pub fn results_format(report: &EvidenceReport, config: &EvidenceConfig) -> Result<PathBuf> {
    let bytes = render(report, config)?;
    let path = config.output_path();
    write_output(&path, &bytes)?;
    info!(
        path = %path.display(),
        format = %config.format,
        bytes = bytes.len(),
        "wrote evidence report"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stig::types::IdentifierMap;

    const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

    fn evidence(entries: Vec<(&str, Vec<&str>)>) -> IdentifierMap {
        entries
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().map(String::from).collect()))
            .collect()
    }

    fn xml(map: &IdentifierMap, placement: TextPlacement) -> String {
        String::from_utf8(render_xml(map, placement, false).unwrap()).unwrap()
    }

    #[test]
    fn test_content_placement_embeds_identifiers_as_text() {
        let map = evidence(vec![("V-1", vec!["AC-2"])]);
        assert_eq!(
            xml(&map, TextPlacement::Content),
            format!("{}<Root><V-ID>V-1<Evidence>AC-2</Evidence></V-ID></Root>\n", DECL)
        );
    }

    #[test]
    fn test_attribute_placement_reproduces_legacy_layout() {
        let map = evidence(vec![("V-1", vec!["AC-2", "AC-2"])]);
        assert_eq!(
            xml(&map, TextPlacement::Attribute),
            format!(
                r#"{}<Root><V-ID text="V-1"><Evidence text="AC-2"/><Evidence text="AC-2"/></V-ID></Root>"#,
                DECL
            ) + "\n"
        );
    }

    #[test]
    fn test_empty_report_is_bare_root() {
        let map = IdentifierMap::new();
        assert_eq!(xml(&map, TextPlacement::Content), format!("{}<Root/>\n", DECL));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let map = evidence(vec![("V-<1>", vec!["AC-2 & AC-3"])]);
        let out = xml(&map, TextPlacement::Content);
        assert!(out.contains("<V-ID>V-&lt;1&gt;"));
        assert!(out.contains("<Evidence>AC-2 &amp; AC-3</Evidence>"));

        let out = xml(&map, TextPlacement::Attribute);
        assert!(out.contains(r#"text="AC-2 &amp; AC-3""#));
    }

    #[test]
    fn test_rendered_xml_parses_back() {
        let map = evidence(vec![("V-1", vec!["AC-2", "AU-3"]), ("V-2", vec!["SC-8"])]);
        let bytes = render_xml(&map, TextPlacement::Content, true).unwrap();
        let root = crate::xml::parse_document(
            std::str::from_utf8(&bytes).unwrap(),
            Path::new("output.xml"),
        )
        .unwrap();

        assert_eq!(root.name, ROOT_ELEMENT);
        assert_eq!(root.children.len(), 2);
        let first = &root.children[0];
        assert_eq!(first.text, "V-1");
        let indices: Vec<&str> = first.children.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(indices, vec!["AC-2", "AU-3"]);
    }

    #[test]
    fn test_pretty_attribute_placement_keeps_values_exact() {
        let map = evidence(vec![("V-1", vec!["AC-2", "AU-3"])]);
        let bytes = render_xml(&map, TextPlacement::Attribute, true).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.lines().count() > 2);

        let root = crate::xml::parse_document(text, Path::new("output.xml")).unwrap();
        let finding = &root.children[0];
        assert_eq!(finding.attr(TEXT_ATTRIBUTE), Some("V-1"));
        let indices: Vec<_> = finding.children.iter().map(|e| e.attr(TEXT_ATTRIBUTE)).collect();
        assert_eq!(indices, vec![Some("AC-2"), Some("AU-3")]);
    }

    #[test]
    fn test_json_keeps_order() {
        let map = evidence(vec![("V-9", vec!["AC-2"]), ("V-1", vec!["AU-3", "AU-3"])]);
        let bytes = render_json(&map).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "vid": "V-9", "evidence": ["AC-2"] },
                { "vid": "V-1", "evidence": ["AU-3", "AU-3"] },
            ])
        );
    }

    #[test]
    fn test_write_output_to_missing_directory_fails() {
        let err = write_output(Path::new("/nonexistent/dir/output.xml"), b"<Root/>").unwrap_err();
        assert!(matches!(err, EvidenceError::Write { .. }));
    }
}
