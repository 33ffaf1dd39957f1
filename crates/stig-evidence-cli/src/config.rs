//! Configuration file parsing for stig-evidence.toml
//!
//! Every setting can also be passed on the command line; flags win over
//! file values. Relative paths in the file are resolved against the file's
//! own directory.
//!
//! ```toml
//! [input]
//! stig = "U_Apache_2-4_STIG_V2R3_Manual-xccdf.xml"
//! cci = "U_CCI_List.xml"
//!
//! [output]
//! name = "apache-evidence"
//! format = "xml"
//! text_placement = "content"
//!
//! [filter]
//! revision = "4"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stig_evidence::{OutputFormat, TextPlacement};

use crate::error::{CliError, Result};

/// Configuration file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "stig-evidence.toml";

/// Root structure of stig-evidence.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Input documents
    #[serde(default)]
    pub input: InputConfig,

    /// Output naming and rendering
    #[serde(default)]
    pub output: OutputConfig,

    /// Reference filtering
    #[serde(default)]
    pub filter: FilterConfig,
}

/// `[input]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// STIG XCCDF document
    pub stig: Option<PathBuf>,

    /// DISA CCI list document
    pub cci: Option<PathBuf>,
}

/// `[output]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Base name of the output file
    pub name: Option<String>,

    /// Directory to write into
    pub dir: Option<PathBuf>,

    /// "xml" or "json"
    pub format: Option<OutputFormat>,

    /// "content" or "attribute"
    pub text_placement: Option<TextPlacement>,

    /// Indent XML output
    pub pretty: Option<bool>,
}

/// `[filter]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// NIST 800-53 revision to keep
    pub revision: Option<String>,
}

impl FileConfig {
    /// Load configuration from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config = Self::from_str(&content, path)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Make relative paths relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.input.stig,
            &mut self.input.cci,
            &mut self.output.dir,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Load the configuration file.
///
/// An explicitly named file must exist. Without one, `stig-evidence.toml`
/// in the working directory is used if present, otherwise all settings come
/// from the command line.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            FileConfig::from_file(path)
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                tracing::debug!(path = DEFAULT_CONFIG_FILE, "using configuration file");
                FileConfig::from_file(default)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[input]
stig = "stig.xml"
cci = "/data/U_CCI_List.xml"

[output]
name = "apache"
dir = "reports"
format = "json"
text_placement = "attribute"
pretty = true

[filter]
revision = "5"
"#;
        let config = FileConfig::from_str(toml, Path::new("stig-evidence.toml")).unwrap();
        assert_eq!(config.input.stig, Some(PathBuf::from("stig.xml")));
        assert_eq!(config.output.name.as_deref(), Some("apache"));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert_eq!(config.output.text_placement, Some(TextPlacement::Attribute));
        assert_eq!(config.output.pretty, Some(true));
        assert_eq!(config.filter.revision.as_deref(), Some("5"));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = FileConfig::from_str("", Path::new("x.toml")).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = FileConfig::from_str("[input]\nstg = \"typo.xml\"\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, CliError::ConfigParse { .. }));
    }

    #[test]
    fn test_invalid_format_rejected() {
        let err = FileConfig::from_str("[output]\nformat = \"yaml\"\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, CliError::ConfigParse { .. }));
    }

    #[test]
    fn test_relative_paths_follow_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stig-evidence.toml");
        std::fs::write(
            &path,
            "[input]\nstig = \"stig.xml\"\ncci = \"/abs/cci.xml\"\n[output]\ndir = \"out\"\n",
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.input.stig, Some(dir.path().join("stig.xml")));
        assert_eq!(config.input.cci, Some(PathBuf::from("/abs/cci.xml")));
        assert_eq!(config.output.dir, Some(dir.path().join("out")));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = load(Some(Path::new("/nonexistent/stig-evidence.toml"))).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound { .. }));
    }
}
