//! Structural validation of sitemap documents
//!
//! Enforces the constraints declared by the bundled schema documents:
//! root element and namespace, allowed children and their order, required
//! `<loc>`, the `changefreq` enumeration, the `priority` range, `lastmod`
//! shape, and the 50,000 entry cap.

use crate::schema::{Schema, SchemaKind, SITEMAP_NAMESPACE};
use crate::SchemaError;
use quick_xml::events::Event;
use quick_xml::Reader;

const CHANGE_FREQUENCIES: [&str; 7] = [
    "always", "hourly", "daily", "weekly", "monthly", "yearly", "never",
];
const MAX_ENTRIES: usize = 50_000;
const LOC_MIN_LENGTH: usize = 12;
const LOC_MAX_LENGTH: usize = 2048;

/// Validates a document's raw content against the selected schema.
///
/// Returns the list of violations found; an empty list means the document
/// conforms. `Err` means the engine itself could not process the document
/// (content that matched a selection marker but is not readable as XML),
/// which callers record as a distinct validation-failure outcome.
pub fn validate(raw_content: &str, schema: &Schema) -> Result<Vec<String>, SchemaError> {
    let mut walker = Walker::new(schema.kind());

    let mut reader = Reader::from_str(raw_content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let xmlns = declared_xmlns(e);
                walker.on_start(&local_name(e.name().as_ref()), xmlns);
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e.name().as_ref());
                let xmlns = declared_xmlns(e);
                walker.on_start(&name, xmlns);
                walker.on_end(&name);
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| SchemaError::Engine(err.to_string()))?;
                walker.on_text(&text);
            }
            Ok(Event::End(ref e)) => {
                walker.on_end(&local_name(e.name().as_ref()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(SchemaError::Engine(e.to_string())),
        }
        buf.clear();
    }

    walker.finish()
}

fn local_name(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    name.rsplit(':').next().unwrap_or(&name).to_string()
}

/// Value of the default `xmlns` attribute, if declared on this element
fn declared_xmlns(element: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"xmlns")
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

/// Event-driven checker for one document
struct Walker {
    container: &'static str,
    entry: &'static str,
    children: &'static [&'static str],
    violations: Vec<String>,
    depth: usize,
    saw_root: bool,
    root_ok: bool,
    entry_count: usize,
    entry_has_loc: bool,
    last_child_rank: Option<usize>,
    current_child: Option<&'static str>,
    current_text: String,
}

impl Walker {
    fn new(kind: SchemaKind) -> Self {
        let (container, entry, children): (_, _, &'static [&'static str]) = match kind {
            SchemaKind::SitemapIndex => ("sitemapindex", "sitemap", &["loc", "lastmod"]),
            SchemaKind::UrlSet => ("urlset", "url", &["loc", "lastmod", "changefreq", "priority"]),
        };
        Walker {
            container,
            entry,
            children,
            violations: Vec::new(),
            depth: 0,
            saw_root: false,
            root_ok: false,
            entry_count: 0,
            entry_has_loc: false,
            last_child_rank: None,
            current_child: None,
            current_text: String::new(),
        }
    }

    fn on_start(&mut self, name: &str, xmlns: Option<String>) {
        match self.depth {
            0 => {
                self.saw_root = true;
                if name == self.container {
                    self.root_ok = true;
                    if xmlns.as_deref() != Some(SITEMAP_NAMESPACE) {
                        self.violations.push(format!(
                            "root element <{}> does not declare the sitemap namespace {}",
                            self.container, SITEMAP_NAMESPACE
                        ));
                    }
                } else {
                    self.violations.push(format!(
                        "unexpected root element <{}>, expected <{}>",
                        name, self.container
                    ));
                }
            }
            1 if self.root_ok => {
                if name == self.entry {
                    self.entry_count += 1;
                    if self.entry_count == MAX_ENTRIES + 1 {
                        self.violations.push(format!(
                            "more than {} <{}> entries",
                            MAX_ENTRIES, self.entry
                        ));
                    }
                    self.entry_has_loc = false;
                    self.last_child_rank = None;
                } else {
                    self.violations.push(format!(
                        "element <{}> is not allowed inside <{}>",
                        name, self.container
                    ));
                }
            }
            2 if self.root_ok => {
                match self.children.iter().position(|child| *child == name) {
                    Some(rank) => {
                        if name == "loc" {
                            self.entry_has_loc = true;
                        }
                        if self.last_child_rank.is_some_and(|last| rank <= last) {
                            self.violations.push(format!(
                                "element <{}> in <{}> entry {} is out of order or duplicated",
                                name, self.entry, self.entry_count
                            ));
                        }
                        self.last_child_rank = Some(rank);
                        self.current_child = Some(self.children[rank]);
                        self.current_text.clear();
                    }
                    None => self.violations.push(format!(
                        "element <{}> is not allowed inside <{}>",
                        name, self.entry
                    )),
                }
            }
            _ if self.root_ok => {
                self.violations
                    .push(format!("unexpected nested element <{}>", name));
            }
            _ => {}
        }
        self.depth += 1;
    }

    fn on_text(&mut self, text: &str) {
        if self.depth == 3 && self.current_child.is_some() {
            self.current_text.push_str(text);
        }
    }

    fn on_end(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);

        if self.depth == 2 && self.root_ok {
            if let Some(child) = self.current_child {
                if child == name {
                    self.check_child_value(child);
                    self.current_child = None;
                }
            }
        }

        if self.depth == 1 && self.root_ok && name == self.entry && !self.entry_has_loc {
            self.violations.push(format!(
                "<{}> entry {} is missing required <loc>",
                self.entry, self.entry_count
            ));
        }
    }

    fn check_child_value(&mut self, child: &'static str) {
        let value = self.current_text.trim().to_string();
        match child {
            "loc" => {
                if value.is_empty() {
                    self.violations.push(format!(
                        "<{}> entry {} has an empty <loc>",
                        self.entry, self.entry_count
                    ));
                } else if value.len() < LOC_MIN_LENGTH || value.len() > LOC_MAX_LENGTH {
                    self.violations.push(format!(
                        "loc value '{}' must be between {} and {} characters",
                        value, LOC_MIN_LENGTH, LOC_MAX_LENGTH
                    ));
                }
            }
            "changefreq" => {
                if !CHANGE_FREQUENCIES.contains(&value.as_str()) {
                    self.violations.push(format!(
                        "invalid changefreq value '{}', must be one of {}",
                        value,
                        CHANGE_FREQUENCIES.join(", ")
                    ));
                }
            }
            "priority" => match value.parse::<f64>() {
                Ok(priority) if (0.0..=1.0).contains(&priority) => {}
                _ => self.violations.push(format!(
                    "priority value '{}' is outside the range 0.0 to 1.0",
                    value
                )),
            },
            "lastmod" => {
                if !is_w3c_datetime(&value) {
                    self.violations.push(format!(
                        "lastmod value '{}' is not a W3C date or datetime",
                        value
                    ));
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<Vec<String>, SchemaError> {
        if !self.saw_root {
            return Err(SchemaError::Engine(
                "document has no root element".to_string(),
            ));
        }
        Ok(self.violations)
    }
}

/// Loose W3C datetime shape check: `YYYY-MM-DD`, optionally followed by a
/// `T`-prefixed time component
fn is_w3c_datetime(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    let date_ok = bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit);
    date_ok && (bytes.len() == 10 || bytes[10] == b'T')
}
