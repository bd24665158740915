//! CLI entry point for paper-downloader.

use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use paper_downloader_core::user_agent::default_user_agent;
use paper_downloader_core::{
    Downloader, Endpoints, HttpFetcher, MetadataClient, Router, StrategyContext,
};
use tracing::{debug, info};

mod app_config;
mod cli;
mod input;
mod output;

use app_config::{RunSettings, load_file_config};
use cli::Args;

/// Some references were not downloaded.
const EXIT_INCOMPLETE: u8 = 2;
/// Configuration, I/O, or other fatal error.
const EXIT_FATAL: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    init_tracing(&args);

    match run(args).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

async fn run(args: Args) -> Result<ExitCode> {
    debug!(?args, "CLI arguments parsed");

    let file_config = load_file_config(args.config.as_deref())?;
    let settings = RunSettings::resolve(&args, &file_config);
    debug!(?settings, "effective settings");

    // Read input: from positional args or stdin
    let input_text = if !args.refs.is_empty() {
        args.refs.join("\n")
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read references from stdin")?;
        buffer
    } else {
        info!("No input provided. Pass references as arguments or pipe them via stdin.");
        info!("Example: echo 'https://arxiv.org/abs/1706.03762' | paper-downloader");
        return Ok(ExitCode::SUCCESS);
    };

    let references = input::parse_references(&input_text);
    if references.is_empty() {
        info!("No references found in input");
        return Ok(ExitCode::SUCCESS);
    }
    info!(references = references.len(), "Parsed input");

    let user_agent = settings
        .user_agent
        .clone()
        .unwrap_or_else(default_user_agent);
    let fetcher = Arc::new(
        HttpFetcher::with_settings(
            settings.connect_timeout,
            settings.request_timeout,
            &user_agent,
        )
        .context("Failed to build HTTP client")?,
    );
    let metadata = MetadataClient::new(fetcher.clone(), Endpoints::default())
        .with_unpaywall_email(settings.unpaywall_email.clone());
    let downloader = Downloader::new(StrategyContext::new(fetcher, metadata), &settings.output_dir)
        .with_router(Router::with_default_strategies().with_doi_timeout(settings.doi_timeout))
        .with_concurrency(settings.concurrency)?;

    let progress = output::should_show_progress(
        io::stderr().is_terminal(),
        args.quiet || args.json,
        output::is_dumb_terminal(),
    )
    .then(|| output::progress_bar(references.len()));

    let report = downloader
        .download_all_with(&references, |result| {
            if let Some(bar) = &progress {
                bar.set_message(output::progress_message(result));
                bar.inc(1);
            }
        })
        .await?;

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", output::render_report(&report));
    }

    if report.all_downloaded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INCOMPLETE))
    }
}
