//! Sitemap-Sentinel: a sitemap hierarchy validator
//!
//! This crate fetches a configured set of root sitemap URLs, recursively
//! expands sitemap-index documents, validates every document against the
//! Sitemaps protocol schemas, collects every advertised page URL with its
//! metadata, and reconciles the collected facts against user-declared
//! expectations.

pub mod config;
pub mod crawler;
pub mod expectations;
pub mod report;
pub mod schema;

use thiserror::Error;

/// Main error type for Sitemap-Sentinel operations
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised by the schema engine itself, as opposed to schema
/// violations found in a document. An engine failure is recorded as a
/// `SchemaValidationFailure` outcome for the sitemap being processed.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema engine could not process the document: {0}")]
    Engine(String),
}

/// Errors raised while reading a sitemap body as XML
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("document is not well-formed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("document has no root element")]
    NoRootElement,
}

/// Result type alias for Sitemap-Sentinel operations
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, ExpectedPage, Validations};
pub use crawler::{CrawlOutcome, Crawler, PageRecord, SitemapOutcome};
pub use expectations::reconcile;
pub use schema::{select_schema, Schema, SchemaKind};
