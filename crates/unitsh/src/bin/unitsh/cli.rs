//! unitsh cli interface

use clap::{Parser, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; unitsh ... }
    #[clap(short = 'C', long = "directory")]
    pub directory: Vec<PathBuf>,

    /// Load units from this file
    #[clap(short = 'f', long = "file", default_value = unitsh::document::DEFAULT_FILE_NAME)]
    pub file: PathBuf,

    /// Print the processed document instead of shell functions
    #[clap(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Format of the --dry-run output
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
