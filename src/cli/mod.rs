//! Command-line parsing for the mandi price Q&A tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! engine and the refresh pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::{DEFAULT_MAX_RECORDS, DEFAULT_PAGE_LIMIT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "samarth",
    version,
    about = "Ask questions about agricultural commodity prices (Agmarknet mandi data)"
)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// File locations; each overrides the corresponding `SAMARTH_*` variable.
#[derive(Debug, Clone, Default, Args)]
pub struct PathArgs {
    /// Cleaned monthly dataset CSV.
    #[arg(long, global = true, value_name = "CSV")]
    pub dataset: Option<PathBuf>,

    /// Raw Agmarknet snapshot JSON.
    #[arg(long, global = true, value_name = "JSON")]
    pub raw: Option<PathBuf>,

    /// Where trend charts are written (SVG).
    #[arg(long, global = true, value_name = "SVG")]
    pub chart: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a single question.
    Ask(AskArgs),
    /// Show the commodity, location and intent extracted from a question.
    Extract(ExtractArgs),
    /// Answer questions line by line from stdin (default when no subcommand is given).
    Chat(ChatArgs),
    /// Download the raw Agmarknet snapshot.
    Fetch(FetchArgs),
    /// Aggregate the raw snapshot into the monthly dataset.
    Clean,
    /// Fetch, then clean.
    Refresh(FetchArgs),
    /// Report dataset location, size and freshness.
    Status,
}

#[derive(Debug, Clone, Args)]
pub struct AskArgs {
    /// The question, e.g. "Brinjal price in Gujarat".
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,

    /// Also print up to N recent dataset rows related to the question.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub support: usize,
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,

    /// Print the extraction as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ChatArgs {
    /// Print up to N recent dataset rows after each answer.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub support: usize,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Records per API page.
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: usize,

    /// Stop requesting pages at this offset.
    #[arg(long, default_value_t = DEFAULT_MAX_RECORDS)]
    pub max_records: usize,
}

impl AskArgs {
    pub fn question(&self) -> String {
        self.question.join(" ")
    }
}

impl ExtractArgs {
    pub fn question(&self) -> String {
        self.question.join(" ")
    }
}
