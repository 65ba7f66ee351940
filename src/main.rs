//! Sitemap-Sentinel main entry point
//!
//! Command-line interface for validating a website's sitemap hierarchy
//! against the Sitemaps protocol and the expectations declared in the
//! run configuration.

use anyhow::Context;
use clap::Parser;
use sitemap_sentinel::config::load_config_with_hash;
use sitemap_sentinel::crawler::crawl;
use sitemap_sentinel::expectations::reconcile;
use sitemap_sentinel::report::emit_reports;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Sentinel: a sitemap hierarchy validator
///
/// Fetches the configured root sitemaps, recursively expands sitemap
/// indexes, validates every document against the protocol schemas, and
/// reconciles the collected URLs against the declared expectations.
#[derive(Parser, Debug)]
#[command(name = "sitemap-sentinel")]
#[command(version = "1.0.0")]
#[command(about = "Validates a sitemap hierarchy against the Sitemaps protocol", long_about = None)]
struct Cli {
    /// Path to JSON configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled, without crawling
    #[arg(long)]
    dry_run: bool,

    /// Override the results folder from the configuration
    #[arg(long, value_name = "DIR")]
    results_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, &config.log_level);
    tracing::info!(
        "Loaded configuration from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let results_folder = cli
        .results_dir
        .unwrap_or_else(|| PathBuf::from(&config.results_folder));

    let outcome = crawl(config.clone()).await?;

    let mut errors = outcome.errors.clone();
    errors.extend(reconcile(
        config.validations.as_ref(),
        &outcome.sitemaps,
        &outcome.pages,
    ));

    emit_reports(&errors, &outcome.sitemaps, &outcome.pages, &results_folder)?;

    if !errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

/// Sets up the tracing subscriber from the CLI flags and configured level
fn setup_logging(verbose: u8, quiet: bool, config_level: &str) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(format!("sitemap_sentinel={},warn", config_level)),
            1 => EnvFilter::new("sitemap_sentinel=debug,info"),
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

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &sitemap_sentinel::config::Config) {
    println!("=== Sitemap-Sentinel Dry Run ===\n");

    println!("Crawl:");
    println!("  User agent: {}", config.user_agent_for_requests);
    println!(
        "  Delay between requests: {}s",
        config.delay_between_requests_in_seconds
    );
    if let Some(max) = config.max_sitemap_fetches {
        println!("  Fetch bound: {}", max);
    }
    println!("  Results folder: {}", config.results_folder);

    println!("\nRoot sitemaps ({}):", config.sitemap_urls.len());
    for url in &config.sitemap_urls {
        println!("  - {}", url);
    }

    if let Some(validations) = &config.validations {
        println!("\nExpectations:");
        if let Some(count) = validations.expected_sitemap_count {
            println!("  Expected sitemap count: {}", count);
        }
        for url in &validations.expected_sitemap_urls {
            println!("  Expected sitemap: {}", url);
        }
        for page in &validations.expected_pages {
            println!(
                "  Expected page: {} (changefreq: {}, priority: {})",
                page.url,
                page.changefreq.as_deref().unwrap_or("<not set>"),
                page.priority.as_deref().unwrap_or("<not set>")
            );
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling from {} root sitemap URLs",
        config.sitemap_urls.len()
    );
}
