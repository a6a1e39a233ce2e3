use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use leadharvest::client::ScrapeulousClient;
use leadharvest::config::{ApiKey, CONFIG, Config, Profile};
use leadharvest::pipeline::Pipeline;

/// Searches the profile's query catalog, crawls the result pages for
/// contact details and writes them to a CSV file.
#[derive(Debug, Parser)]
#[command(name = "leadharvest", version)]
struct Cli {
    /// Scrapeulous API key
    api_key: String,

    /// Run profile: law or law-urls
    #[arg(long, default_value = "law")]
    profile: Profile,

    /// Output file, defaults to the profile's
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Urls per crawl request, defaults to the profile's
    #[arg(long)]
    batch_size: Option<usize>,

    /// Search result pages per query
    #[arg(long)]
    pages: Option<u32>,

    /// Crawl batches in flight at once
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Only run the search and print the candidate urls
    #[arg(long)]
    dry_run: bool,

    #[arg(short, long)]
    verbose: bool,
}

/// The selected profile with the environment and command line applied.
fn build_profile(cli: &Cli, config: &Config) -> Profile {
    let mut profile = cli.profile.clone();
    profile.region = config.region.clone();
    if let Some(output) = &cli.output {
        profile.output = output.clone();
    }
    if let Some(batch_size) = cli.batch_size {
        profile.batch_size = batch_size;
    }
    if let Some(pages) = cli.pages {
        profile.num_pages = pages;
    }
    profile
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {e:#}");
    }

    // Bridge log crate -> tracing (so log::info! etc. work)
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("failed to bridge log records: {e:#}");
    }

    if let Err(e) = run(cli).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let api_key = ApiKey::new(cli.api_key.as_str())?;
    let profile = build_profile(&cli, &CONFIG);

    let client = ScrapeulousClient::from_config(&CONFIG)?;
    let pipeline = Pipeline::new(client.clone(), client, api_key, profile)
        .with_concurrency(cli.concurrency)
        .dry_run(cli.dry_run);

    let summary = pipeline
        .run()
        .await
        .with_context(|| format!("lead run with profile {} failed", pipeline.profile().name))?;

    match summary.output {
        Some(output) => println!(
            "{} leads from {} urls written to {}",
            summary.rows,
            summary.urls.len(),
            output.display()
        ),
        None => {
            for url in &summary.urls {
                println!("{url}");
            }
        }
    }
    Ok(())
}
