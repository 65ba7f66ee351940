//! Sitemap XML extraction
//!
//! Pulls child sitemap locations and page records out of a document that
//! has already passed schema validation. Child sitemaps come from
//! `sitemapindex/sitemap/loc`; page records come from `urlset/url` and from
//! the `sitemapindex/urlset/url` path some generators emit.

use crate::XmlError;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

/// One `<url>` entry collected from a urlset document
///
/// `priority` and `changefreq` are kept verbatim as found in markup; they
/// are never parsed into numbers during collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub priority: Option<String>,
    pub changefreq: Option<String>,
}

/// References extracted from one validated sitemap document
#[derive(Debug, Default)]
pub struct ExtractedReferences {
    /// Child sitemap URLs, in document order
    pub child_sitemaps: Vec<String>,
    /// Page records, in document order
    pub pages: Vec<PageRecord>,
}

#[derive(Default)]
struct PageDraft {
    loc: Option<String>,
    priority: Option<String>,
    changefreq: Option<String>,
}

/// Checks that a fetched body reads as an XML document with a root element
pub fn ensure_well_formed(raw_content: &str) -> Result<(), XmlError> {
    let mut reader = Reader::from_str(raw_content);
    let mut saw_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) | Ok(Event::Empty(_)) => saw_root = true,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XmlError::Malformed(e)),
        }
        buf.clear();
    }

    if saw_root {
        Ok(())
    } else {
        Err(XmlError::NoRootElement)
    }
}

/// Extracts child sitemap references and page records from a document
pub fn extract_references(raw_content: &str) -> Result<ExtractedReferences, XmlError> {
    let mut reader = Reader::from_str(raw_content);
    reader.config_mut().trim_text(true);

    let mut references = ExtractedReferences::default();
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut text = String::new();
    let mut current_page: Option<PageDraft> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e.name().as_ref());
                if path.is_empty() {
                    saw_root = true;
                }
                if name == "url" && at_urlset(&path) {
                    current_page = Some(PageDraft::default());
                }
                path.push(name);
                text.clear();
            }
            Ok(Event::Empty(_)) => {
                // An empty element carries no loc and contributes nothing
                if path.is_empty() {
                    saw_root = true;
                }
            }
            Ok(Event::Text(ref e)) => {
                let value = e.unescape().map_err(XmlError::Malformed)?;
                text.push_str(&value);
            }
            Ok(Event::End(_)) => {
                let name = path.pop().unwrap_or_default();
                match name.as_str() {
                    "loc" if path_is(&path, &["sitemapindex", "sitemap"]) => {
                        references.child_sitemaps.push(text.trim().to_string());
                    }
                    "loc" if in_page(&current_page, &path) => {
                        if let Some(page) = current_page.as_mut() {
                            page.loc = Some(text.trim().to_string());
                        }
                    }
                    "priority" if in_page(&current_page, &path) => {
                        if let Some(page) = current_page.as_mut() {
                            page.priority = Some(text.trim().to_string());
                        }
                    }
                    "changefreq" if in_page(&current_page, &path) => {
                        if let Some(page) = current_page.as_mut() {
                            page.changefreq = Some(text.trim().to_string());
                        }
                    }
                    "url" if at_urlset(&path) => {
                        if let Some(draft) = current_page.take() {
                            // A record without a loc has no key and is skipped
                            if let Some(loc) = draft.loc {
                                references.pages.push(PageRecord {
                                    url: loc,
                                    priority: draft.priority,
                                    changefreq: draft.changefreq,
                                });
                            }
                        }
                    }
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XmlError::Malformed(e)),
        }
        buf.clear();
    }

    if !saw_root {
        return Err(XmlError::NoRootElement);
    }

    Ok(references)
}

fn local_name(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    name.rsplit(':').next().unwrap_or(&name).to_string()
}

fn path_is(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}

/// True when the current path is a urlset container a `<url>` can live in
fn at_urlset(path: &[String]) -> bool {
    path_is(path, &["urlset"]) || path_is(path, &["sitemapindex", "urlset"])
}

/// True when we are directly inside an open `<url>` record
fn in_page(current_page: &Option<PageDraft>, path: &[String]) -> bool {
    current_page.is_some() && path.last().map(String::as_str) == Some("url")
}
