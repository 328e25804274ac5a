//! CLI argument definitions for the registry recoder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use recode_model::OutputFormat;

#[derive(Parser)]
#[command(
    name = "recode",
    version,
    about = "Recode pathology registry exports with versioned terminology codebooks",
    long_about = "Translate tab-separated pathology registry exports into standardized \
                  vocabulary terms using versioned terminology codebooks.\n\n\
                  Supports flat text output and warehouse output (merged columns, \
                  per-subject wide pivot and an import tree sheet)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Translate a registry export.
    Recode(RecodeArgs),

    /// List the configured protocols and their terminology prefixes.
    Protocols(ProtocolsArgs),
}

#[derive(Parser)]
pub struct RecodeArgs {
    /// Tab-separated registry export to translate.
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Protocol the export was recorded under.
    #[arg(long = "protocol", value_name = "NAME")]
    pub protocol: String,

    /// Directory with downloaded terminology snapshots.
    #[arg(long = "terminology-dir", value_name = "DIR")]
    pub terminology_dir: PathBuf,

    /// Source language of the terminology.
    #[arg(long = "language", default_value = "nl-NL")]
    pub language: String,

    /// Rendering of translated headers and values.
    #[arg(long = "format", value_enum, default_value = "descriptions")]
    pub format: OutputFormatArg,

    /// Output mode: flat text or warehouse (merged columns and tree sheet).
    #[arg(long = "mode", value_enum, default_value = "text")]
    pub mode: ModeArg,

    /// Pivot warehouse output to one line per subject.
    #[arg(long = "wide")]
    pub wide: bool,

    /// Tree template mapping base column names to warehouse paths
    /// (required in warehouse mode).
    #[arg(long = "tree-template", value_name = "PATH")]
    pub tree_template: Option<PathBuf>,

    /// Study name placed at the root of the tree sheet.
    #[arg(long = "study-name", value_name = "NAME", default_value = "")]
    pub study_name: String,

    /// Subject identifier column (required in warehouse mode).
    #[arg(long = "subject-id", value_name = "COLUMN")]
    pub subject_id: Option<String>,

    /// Column holding the protocol version of each line.
    #[arg(long = "version-column", default_value = "depvenr")]
    pub version_column: String,

    /// Translated data output file (default: <input stem>_out.txt).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Tree sheet output file (default: <input stem>_treeOut.txt).
    #[arg(long = "tree-output", value_name = "PATH")]
    pub tree_output: Option<PathBuf>,

    /// TOML file extending the built-in protocol catalog.
    #[arg(long = "protocols-file", value_name = "PATH")]
    pub protocols_file: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ProtocolsArgs {
    /// TOML file extending the built-in protocol catalog.
    #[arg(long = "protocols-file", value_name = "PATH")]
    pub protocols_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Text,
    Warehouse,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Descriptions,
    Codes,
    CodesystemAndCodes,
    CodesAndDescriptions,
    CodesystemAndCodesAndDescriptions,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Descriptions => OutputFormat::Descriptions,
            OutputFormatArg::Codes => OutputFormat::Codes,
            OutputFormatArg::CodesystemAndCodes => OutputFormat::CodesystemAndCodes,
            OutputFormatArg::CodesAndDescriptions => OutputFormat::CodesAndDescriptions,
            OutputFormatArg::CodesystemAndCodesAndDescriptions => {
                OutputFormat::CodesystemAndCodesAndDescriptions
            }
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
