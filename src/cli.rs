//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Resolve article references to PDFs and download them.
///
/// References are PubMed URLs, DOIs (bare or doi.org links), arXiv links,
/// or publisher landing pages. Pass them as arguments or pipe them on stdin,
/// one per line.
#[derive(Parser, Debug)]
#[command(name = "paper-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// References to resolve (read from stdin when omitted)
    #[arg(value_name = "REFS")]
    pub refs: Vec<String>,

    /// Directory to save PDFs in [default: downloaded_papers]
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// References processed in parallel (1-16) [default: 1]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub concurrency: Option<u8>,

    /// Per-request timeout in seconds (1-3600) [default: 20]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Contact email enabling Unpaywall lookups for PubMed articles
    #[arg(long, value_name = "EMAIL")]
    pub unpaywall_email: Option<String>,

    /// Config file path (overrides the XDG default location)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
