//! Crawl coordinator - the work-queue-driven sitemap traversal
//!
//! Owns the LIFO work queue and the two outcome maps, and drives the
//! fetch -> parse -> schema-select -> schema-validate -> extract pipeline
//! for every queued sitemap URL. Every per-document failure is contained at
//! the document level; the crawl only ends when the queue empties (or the
//! opt-in fetch bound trips).

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_sitemap, FetchResult};
use crate::crawler::parser::{ensure_well_formed, extract_references, PageRecord};
use crate::schema::{select_schema, validate};
use crate::SentinelError;
use reqwest::Client;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Outcome recorded for one sitemap processing attempt
///
/// Exactly one entry per attempt; a URL visited twice has its entry
/// overwritten by the second attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapOutcome {
    /// HTTP status received; 200 is the only success value
    HttpStatus(u16),
    /// Connection-level failure, no status obtained
    TransportFailure,
    /// Body could not be read as XML
    XmlParseFailure,
    /// The schema engine itself failed on the document
    SchemaValidationFailure,
}

impl SitemapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SitemapOutcome::HttpStatus(200))
    }
}

impl fmt::Display for SitemapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitemapOutcome::HttpStatus(code) => write!(f, "{}", code),
            SitemapOutcome::TransportFailure => write!(f, "Failed"),
            SitemapOutcome::XmlParseFailure => write!(f, "Failed xml parse"),
            SitemapOutcome::SchemaValidationFailure => write!(f, "Failed schema validation"),
        }
    }
}

impl Serialize for SitemapOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Statuses serialize as numbers, failures as their descriptions
        match self {
            SitemapOutcome::HttpStatus(code) => serializer.serialize_u16(*code),
            other => serializer.collect_str(other),
        }
    }
}

/// Frozen result of one crawl: the outcome maps and crawl-time errors
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Sitemap URL to processing outcome
    pub sitemaps: BTreeMap<String, SitemapOutcome>,
    /// Page URL to collected record, last write wins across the whole crawl
    pub pages: BTreeMap<String, PageRecord>,
    /// Schema errors surfaced while crawling, in discovery order
    pub errors: Vec<String>,
}

/// Single-run crawler; owns its queue and maps exclusively for one run
pub struct Crawler {
    config: Config,
    client: Client,
    queue: Vec<String>,
    sitemaps: BTreeMap<String, SitemapOutcome>,
    pages: BTreeMap<String, PageRecord>,
    errors: Vec<String>,
    attempts: u64,
}

impl Crawler {
    /// Creates a crawler with a fresh queue seeded from the root sitemap URLs
    pub fn new(config: Config) -> Result<Self, SentinelError> {
        let client = build_http_client(&config.user_agent_for_requests)?;
        let queue = config.sitemap_urls.clone();

        Ok(Self {
            config,
            client,
            queue,
            sitemaps: BTreeMap::new(),
            pages: BTreeMap::new(),
            errors: Vec::new(),
            attempts: 0,
        })
    }

    /// Drains the work queue and returns the frozen outcome
    ///
    /// The queue is processed last-in-first-out: children discovered in a
    /// sitemap index are processed before previously queued siblings. URLs
    /// are not deduplicated; a sitemap referenced twice is fetched twice.
    /// The configured delay runs between requests, never after the last one.
    pub async fn run(mut self) -> CrawlOutcome {
        tracing::info!("Validating sitemaps");

        while let Some(sitemap_url) = self.queue.pop() {
            self.attempts += 1;
            self.process_sitemap(&sitemap_url).await;

            if self.queue.is_empty() {
                break;
            }

            if self
                .config
                .max_sitemap_fetches
                .is_some_and(|max| self.attempts >= max)
            {
                let message = format!(
                    "Crawl stopped after {} sitemap fetches with {} still queued",
                    self.attempts,
                    self.queue.len()
                );
                tracing::error!("{}", message);
                self.errors.push(message);
                break;
            }

            tokio::time::sleep(Duration::from_secs_f64(
                self.config.delay_between_requests_in_seconds,
            ))
            .await;
        }

        tracing::info!(
            "Crawl finished: {} sitemaps processed, {} urls collected",
            self.sitemaps.len(),
            self.pages.len()
        );

        CrawlOutcome {
            sitemaps: self.sitemaps,
            pages: self.pages,
            errors: self.errors,
        }
    }

    /// Processes one queued sitemap URL through the full pipeline
    async fn process_sitemap(&mut self, sitemap_url: &str) {
        tracing::debug!("Processing sitemap_url={}", sitemap_url);

        let body = match fetch_sitemap(&self.client, sitemap_url).await {
            FetchResult::Body { body } => {
                tracing::info!("Got contents for sitemap_url={}", sitemap_url);
                self.sitemaps
                    .insert(sitemap_url.to_string(), SitemapOutcome::HttpStatus(200));
                body
            }
            FetchResult::HttpStatus(code) => {
                tracing::error!(
                    "Could not GET sitemap_url={} response code={}",
                    sitemap_url,
                    code
                );
                self.sitemaps
                    .insert(sitemap_url.to_string(), SitemapOutcome::HttpStatus(code));
                return;
            }
            FetchResult::TransportError { message } => {
                tracing::error!("Could not GET sitemap_url={} error={}", sitemap_url, message);
                self.sitemaps
                    .insert(sitemap_url.to_string(), SitemapOutcome::TransportFailure);
                return;
            }
        };

        if let Err(e) = ensure_well_formed(&body) {
            tracing::error!(
                "sitemap_url={} contents could not be parsed as xml: {}",
                sitemap_url,
                e
            );
            self.sitemaps
                .insert(sitemap_url.to_string(), SitemapOutcome::XmlParseFailure);
            return;
        }

        let Some(schema) = select_schema(&body) else {
            // Unvalidatable documents are reported, never silently skipped;
            // the recorded 200 outcome is left alone.
            let message = format!(
                "Sitemap {} cannot be validated, no schema matches its content",
                sitemap_url
            );
            tracing::error!("{}", message);
            self.errors.push(message);
            return;
        };
        tracing::debug!(
            "Selected schema {} for sitemap_url={}",
            schema.name(),
            sitemap_url
        );

        let violations = match validate(&body, &schema) {
            Ok(violations) => violations,
            Err(e) => {
                // Engine failure gets the dedicated outcome tag
                tracing::error!("Sitemap {} failed schema validation: {}", sitemap_url, e);
                self.sitemaps.insert(
                    sitemap_url.to_string(),
                    SitemapOutcome::SchemaValidationFailure,
                );
                return;
            }
        };

        if !violations.is_empty() {
            // Violations block extraction but do not overwrite the 200
            for violation in violations {
                let message = format!("Sitemap {} contains error={}", sitemap_url, violation);
                tracing::error!("{}", message);
                self.errors.push(message);
            }
            return;
        }

        match extract_references(&body) {
            Ok(references) => {
                for child in references.child_sitemaps {
                    self.queue.push(child);
                }
                for page in references.pages {
                    self.pages.insert(page.url.clone(), page);
                }
            }
            Err(e) => {
                tracing::error!(
                    "sitemap_url={} contents could not be parsed as xml: {}",
                    sitemap_url,
                    e
                );
                self.sitemaps
                    .insert(sitemap_url.to_string(), SitemapOutcome::XmlParseFailure);
            }
        }
    }
}
