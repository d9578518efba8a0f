//! Portal-Chef main entry point
//!
//! This is the command-line interface for the Portal-Chef curriculum crawler.

use anyhow::Context;
use clap::Parser;
use portal_chef::config::{load_config_with_hash, Config};
use portal_chef::crawler::{Crawler, PageFetcher};
use portal_chef::output::{
    load_statistics, print_statistics, print_tree_statistics, write_outline, TreeStatistics,
};
use portal_chef::storage::open_storage;
use portal_chef::PortalClient;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Portal-Chef: an authenticated curriculum crawler
///
/// Portal-Chef logs into an educational-content portal, walks its curriculum
/// tabs, sections and resources, downloads every resource document and
/// assembles a validated channel tree.
#[derive(Parser, Debug)]
#[command(name = "portal-chef")]
#[command(version = "1.0.0")]
#[command(about = "An authenticated curriculum crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the run ledger and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("portal_chef=info,warn"),
            1 => EnvFilter::new("portal_chef=debug,info"),
            2 => EnvFilter::new("portal_chef=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let fetcher = PageFetcher::new(&config.portal.base_url, config.render.load_js)?;

    println!("=== Portal-Chef Dry Run ===\n");

    println!("Portal:");
    println!("  Base URL: {}", fetcher.base());
    println!("  Landing page: {}", fetcher.resolve(&config.portal.landing_path)?);
    println!("  Login page: {}", fetcher.resolve(&config.portal.login_path)?);
    println!("  Account: {}", config.credentials.email);

    println!("\nChannel:");
    println!("  Name: {}", config.channel.name);
    println!("  Source ID: {}", config.channel.source_id);
    println!("  Source domain: {}", config.channel.source_domain);
    println!("  Language: {}", config.channel.language);
    println!("  License: {}", config.channel.license);
    println!("  Copyright holder: {}", config.channel.copyright_holder);

    println!("\nCrawler:");
    println!("  Download directory: {}", config.crawler.download_directory);
    println!("  Branch errors: {:?}", config.crawler.branch_errors);
    println!("  Identifier collisions: {:?}", config.crawler.id_collisions);
    if config.render.load_js {
        println!("  Renderer: {}", config.render.command.join(" "));
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the run ledger
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Channel '{}' from {}",
        config.channel.name,
        config.portal.base_url
    );

    let summary_path = PathBuf::from(&config.output.summary_path);
    let ledger = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("opening ledger {}", config.output.database_path))?;
    let client = PortalClient::from_config(&config)?;
    let mut crawler = Crawler::new(config, client)?.with_ledger(ledger, config_hash);

    let channel = match crawler.run().await {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            tracing::error!("Last step: {}", crawler.last_step());
            return Err(e.into());
        }
    };

    write_outline(&channel, &summary_path)?;
    tracing::info!("Outline written to {}", summary_path.display());

    print_tree_statistics(&channel, &TreeStatistics::from_channel(&channel));

    Ok(())
}
