//! Evidence run configuration
//!
//! Input paths, output naming, and serialization options are passed
//! explicitly into each pipeline stage.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EvidenceError;

/// NIST 800-53 revision retained by default
pub const DEFAULT_REVISION: &str = "4";

/// Output base name used when none is supplied
pub const DEFAULT_OUTPUT_NAME: &str = "output";

/// Configuration for a single evidence run.
///
/// # Example
///
/// ```ignore
/// use stig_evidence::EvidenceConfig;
///
/// let config = EvidenceConfig::builder()
///     .stig_path("U_Apache_2-4_STIG_V2R3_Manual-xccdf.xml")
///     .cci_path("U_CCI_List.xml")
///     .output_name("apache-evidence")
///     .build();
///
/// stig_evidence::run(&config)?;
/// ```
#[derive(Debug, Clone)]
pub struct EvidenceConfig {
    /// Path to the XCCDF STIG document
    pub stig_path: PathBuf,

    /// Path to the DISA CCI list document
    pub cci_path: PathBuf,

    /// Output base name; the extension is derived from `format`
    pub output_name: String,

    /// Directory the output file is written into
    pub output_dir: PathBuf,

    /// NIST 800-53 revision whose references are retained
    pub revision: String,

    /// Output document format
    pub format: OutputFormat,

    /// Where identifiers are written in XML output
    pub text_placement: TextPlacement,

    /// Indent XML output.
    ///
    /// With the default `content` placement each `V-ID` mixes its VID text
    /// with `Evidence` children, so indentation adds whitespace-only text
    /// between the `Evidence` siblings. Consumers that read mixed content
    /// should use compact output or `attribute` placement.
    pub pretty: bool,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            stig_path: PathBuf::new(),
            cci_path: PathBuf::new(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            output_dir: PathBuf::from("."),
            revision: DEFAULT_REVISION.to_string(),
            format: OutputFormat::default(),
            text_placement: TextPlacement::default(),
            pretty: false,
        }
    }
}

impl EvidenceConfig {
    /// Create a new builder
    pub fn builder() -> EvidenceConfigBuilder {
        EvidenceConfigBuilder::default()
    }

    /// Full path of the output artifact, `<output_dir>/<output_name>.<ext>`
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.output_name, self.format.extension()))
    }

    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<(), EvidenceError> {
        if self.stig_path.as_os_str().is_empty() {
            return Err(EvidenceError::config("no STIG document path given"));
        }
        if self.cci_path.as_os_str().is_empty() {
            return Err(EvidenceError::config("no CCI document path given"));
        }
        if self.output_name.trim().is_empty() {
            return Err(EvidenceError::config("output name must not be empty"));
        }
        if self.revision.trim().is_empty() {
            return Err(EvidenceError::config("revision must not be empty"));
        }
        Ok(())
    }
}

/// Builder for EvidenceConfig
#[derive(Debug, Clone, Default)]
pub struct EvidenceConfigBuilder {
    config: EvidenceConfig,
}

impl EvidenceConfigBuilder {
    /// Set the STIG document path.
    pub fn stig_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.stig_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the CCI document path.
    pub fn cci_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.cci_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the output base name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = name.into();
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the retained NIST 800-53 revision.
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.config.revision = revision.into();
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set identifier placement for XML output.
    pub fn text_placement(mut self, placement: TextPlacement) -> Self {
        self.config.text_placement = placement;
        self
    }

    /// Enable or disable indented XML.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EvidenceConfig {
        self.config
    }
}

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Root` / `V-ID` / `Evidence` element tree
    #[default]
    Xml,
    /// Ordered array of `{ "vid", "evidence" }` objects
    Json,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = EvidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            other => Err(EvidenceError::config(format!(
                "unknown output format '{}'. Use 'xml' or 'json'",
                other
            ))),
        }
    }
}

/// Placement of VID and evidence identifiers in XML output
///
/// `Attribute` reproduces the legacy report layout, which carried each
/// identifier in a `text` attribute and left the elements empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPlacement {
    /// `<V-ID>V-1<Evidence>AC-2</Evidence></V-ID>`
    #[default]
    Content,
    /// `<V-ID text="V-1"><Evidence text="AC-2"/></V-ID>`
    Attribute,
}

impl fmt::Display for TextPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => f.write_str("content"),
            Self::Attribute => f.write_str("attribute"),
        }
    }
}

impl FromStr for TextPlacement {
    type Err = EvidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "content" | "text" => Ok(Self::Content),
            "attribute" | "attr" | "legacy" => Ok(Self::Attribute),
            other => Err(EvidenceError::config(format!(
                "unknown text placement '{}'. Use 'content' or 'attribute'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvidenceConfig::default();
        assert_eq!(config.output_name, "output");
        assert_eq!(config.revision, "4");
        assert_eq!(config.format, OutputFormat::Xml);
        assert_eq!(config.text_placement, TextPlacement::Content);
        assert!(!config.pretty);
    }

    #[test]
    fn test_output_path_uses_format_extension() {
        let config = EvidenceConfig::builder()
            .output_name("report")
            .output_dir("/tmp/out")
            .build();
        assert_eq!(config.output_path(), PathBuf::from("/tmp/out/report.xml"));

        let config = EvidenceConfig::builder()
            .output_name("report")
            .format(OutputFormat::Json)
            .build();
        assert_eq!(config.output_path(), PathBuf::from("./report.json"));
    }

    #[test]
    fn test_validate_requires_inputs() {
        let config = EvidenceConfig::builder().cci_path("cci.xml").build();
        assert!(matches!(config.validate(), Err(EvidenceError::Config { .. })));

        let config = EvidenceConfig::builder().stig_path("stig.xml").build();
        assert!(config.validate().is_err());

        let config = EvidenceConfig::builder()
            .stig_path("stig.xml")
            .cci_path("cci.xml")
            .build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_output_name() {
        let config = EvidenceConfig::builder()
            .stig_path("stig.xml")
            .cci_path("cci.xml")
            .output_name("  ")
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_format_and_placement() {
        assert_eq!("XML".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());

        assert_eq!(
            "legacy".parse::<TextPlacement>().unwrap(),
            TextPlacement::Attribute
        );
        assert_eq!(
            "content".parse::<TextPlacement>().unwrap(),
            TextPlacement::Content
        );
        assert!("inline".parse::<TextPlacement>().is_err());
    }
}
