//! Sitemap protocol schemas
//!
//! This module bundles the two fixed XML Schema documents of the Sitemaps
//! protocol and decides which one applies to a fetched document. Selection
//! is substring-based against the raw content rather than namespace-aware;
//! any document mentioning the index markers gets the index schema.

mod validator;

pub use validator::validate;

/// The sitemap protocol namespace every document must declare
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Content markers used to select a schema
const SITEMAP_INDEX_MARKERS: [&str; 2] = ["<sitemapindex", "siteindex.xsd"];
const URLSET_MARKER: &str = r#"xmlns="http://www.sitemaps.org/schemas/sitemap/0.9""#;

const SITEMAP_INDEX_XSD: &str = include_str!("../../schemas/siteindex.xsd");
const URLSET_XSD: &str = include_str!("../../schemas/sitemap.xsd");

/// Which of the two fixed sitemap schemas a document is validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// `siteindex.xsd`: an index of child sitemap locations
    SitemapIndex,
    /// `sitemap.xsd`: a set of page URLs with optional metadata
    UrlSet,
}

/// A selected schema: its kind plus the bundled schema document it mirrors
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    kind: SchemaKind,
    definition: &'static str,
}

impl Schema {
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// File name of the bundled schema resource
    pub fn name(&self) -> &'static str {
        match self.kind {
            SchemaKind::SitemapIndex => "siteindex.xsd",
            SchemaKind::UrlSet => "sitemap.xsd",
        }
    }

    /// Full text of the bundled XML Schema document
    pub fn definition(&self) -> &'static str {
        self.definition
    }
}

/// Selects the schema that applies to a fetched document, or `None` when
/// neither marker matches and the document cannot be validated.
///
/// The sitemap-index markers are checked first: a document mentioning
/// `<sitemapindex` or `siteindex.xsd` anywhere selects the index schema even
/// if it also declares the urlset namespace.
pub fn select_schema(raw_content: &str) -> Option<Schema> {
    if SITEMAP_INDEX_MARKERS
        .iter()
        .any(|marker| raw_content.contains(marker))
    {
        Some(Schema {
            kind: SchemaKind::SitemapIndex,
            definition: SITEMAP_INDEX_XSD,
        })
    } else if raw_content.contains(URLSET_MARKER) {
        Some(Schema {
            kind: SchemaKind::UrlSet,
            definition: URLSET_XSD,
        })
    } else {
        None
    }
}
