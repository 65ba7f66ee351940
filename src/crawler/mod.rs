//! Crawler module for sitemap fetching and processing
//!
//! This module contains the core crawl pipeline:
//! - HTTP fetching with the configured request headers
//! - Sitemap XML extraction (child sitemaps and page records)
//! - The work-queue-driven traversal with per-document schema validation

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{CrawlOutcome, Crawler, SitemapOutcome};
pub use fetcher::{build_http_client, fetch_sitemap, FetchResult};
pub use parser::{ensure_well_formed, extract_references, ExtractedReferences, PageRecord};

use crate::config::Config;
use crate::SentinelError;

/// Runs a complete crawl of the configured sitemap hierarchy
///
/// Seeds the work queue from the configuration's root sitemap URLs, drains
/// it depth-first, and returns the frozen outcome maps plus any errors
/// surfaced while crawling.
pub async fn crawl(config: Config) -> Result<CrawlOutcome, SentinelError> {
    Ok(Crawler::new(config)?.run().await)
}
