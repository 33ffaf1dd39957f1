//! stig-evidence CLI - STIG to NIST 800-53 evidence report tool
//!
//! Parses a DISA STIG XCCDF benchmark and the DISA CCI list, then writes a
//! report naming the NIST 800-53 controls each STIG finding provides
//! evidence for.
//!
//! STIG benchmarks: https://public.cyber.mil/stigs/downloads/
//! CCI list: https://dl.dod.cyber.mil/wp-content/uploads/stigs/zip/u_cci_list.zip

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod error;
mod logging;
mod output;

use config::FileConfig;
use error::{CliError, Result};
use stig_evidence::{EvidenceConfig, OutputFormat, TextPlacement, DEFAULT_OUTPUT_NAME};

/// Parse a STIG XML file and list NIST 800-53 Rev. 4 evidence per finding
#[derive(Parser, Debug)]
#[command(name = "stig-evidence")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to STIG XML file to be parsed
    #[arg(short = 'f', long = "file", value_name = "FILE_PATH")]
    file: Option<PathBuf>,

    /// Path to CCI XML file to be parsed
    #[arg(short, long, value_name = "FILE_PATH")]
    cci: Option<PathBuf>,

    /// Output file name, without extension [default: output]
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Directory to write the output file into [default: .]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// NIST 800-53 revision to keep [default: 4]
    #[arg(long, value_name = "REV")]
    revision: Option<String>,

    /// Output format: xml, json [default: xml]
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Where identifiers go in XML output: content, attribute [default: content]
    #[arg(long, value_name = "PLACEMENT")]
    text_placement: Option<TextPlacement>,

    /// Indent XML output
    #[arg(long)]
    pretty: bool,

    /// Print the report to stdout instead of writing a file
    #[arg(long)]
    dry_run: bool,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    json_summary: bool,

    /// Path to a stig-evidence.toml configuration file
    #[arg(long, value_name = "FILE_PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Merge command-line flags over file configuration
    fn resolve_config(&self, file: FileConfig) -> Result<EvidenceConfig> {
        let stig_path = self
            .file
            .clone()
            .or(file.input.stig)
            .ok_or_else(|| CliError::missing_input("--file", "STIG document"))?;
        let cci_path = self
            .cci
            .clone()
            .or(file.input.cci)
            .ok_or_else(|| CliError::missing_input("--cci", "CCI document"))?;

        let mut builder = EvidenceConfig::builder()
            .stig_path(stig_path)
            .cci_path(cci_path)
            .output_name(
                self.output
                    .clone()
                    .or(file.output.name)
                    .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
            )
            .format(self.format.or(file.output.format).unwrap_or_default())
            .text_placement(
                self.text_placement
                    .or(file.output.text_placement)
                    .unwrap_or_default(),
            )
            .pretty(self.pretty || file.output.pretty.unwrap_or(false));

        if let Some(dir) = self.output_dir.clone().or(file.output.dir) {
            builder = builder.output_dir(dir);
        }
        if let Some(revision) = self.revision.clone().or(file.filter.revision) {
            builder = builder.revision(revision);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        output::warning(&e.to_string());
    }

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Command Implementation
// =============================================================================

fn execute(cli: &Cli) -> Result<()> {
    let file_config = config::load(cli.config.as_deref())?;
    let config = cli.resolve_config(file_config)?;

    if !cli.json_summary {
        output::print_banner();
        output::info(&format!("STIG: {}", config.stig_path.display()));
        output::info(&format!("CCI:  {}", config.cci_path.display()));
    }

    if cli.dry_run {
        let report = stig_evidence::build_report(&config)?;
        let rendered = stig_evidence::stig::report::render(&report, &config)?;

        if cli.json_summary {
            return print_summary_json(&config, &report.stats);
        }

        output::subheader(&format!("Would write {}:", config.output_path().display()));
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&rendered)
            .and_then(|()| stdout.flush())
            .map_err(|e| stig_evidence::EvidenceError::Write {
                path: PathBuf::from("<stdout>"),
                source: e,
            })?;
        return Ok(());
    }

    let run = stig_evidence::run(&config)?;

    if cli.json_summary {
        print_summary_json(&config, &run.report.stats)
    } else {
        output::print_summary(&run.report.stats, &run.output_path);
        Ok(())
    }
}

/// Paths are rendered lossily so non-UTF-8 file names still produce a summary.
fn print_summary_json(config: &EvidenceConfig, stats: &stig_evidence::EvidenceStats) -> Result<()> {
    let summary = serde_json::json!({
        "stig": config.stig_path.display().to_string(),
        "cci": config.cci_path.display().to_string(),
        "output": config.output_path().display().to_string(),
        "format": serde_json::to_value(&config.format)?,
        "revision": config.revision,
        "stats": serde_json::to_value(stats)?,
    });
    output::print_json(&summary)?;
    Ok(())
}
