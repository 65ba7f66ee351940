//! Expectation reconciliation
//!
//! Turns the frozen outcome maps and the configuration's optional
//! expectations into an ordered list of human-readable errors. Every rule
//! is evaluated independently; nothing short-circuits, so one run reports
//! every violation at once.

use crate::config::Validations;
use crate::crawler::{PageRecord, SitemapOutcome};
use std::collections::BTreeMap;

/// Reconciles collected facts against the declared expectations
///
/// The non-200 rule always runs; the remaining rules run only when the
/// configuration carries a `validations` block. Errors are appended in rule
/// order: non-200 outcomes, sitemap count, expected sitemap presence,
/// expected page checks.
pub fn reconcile(
    validations: Option<&Validations>,
    sitemaps: &BTreeMap<String, SitemapOutcome>,
    pages: &BTreeMap<String, PageRecord>,
) -> Vec<String> {
    let mut errors = Vec::new();

    for (url, outcome) in sitemaps {
        if !outcome.is_success() {
            errors.push(format!(
                "Sitemap url={} returned {} instead of 200",
                url, outcome
            ));
        }
    }

    let Some(validations) = validations else {
        return errors;
    };

    if let Some(expected_count) = validations.expected_sitemap_count {
        let actual_count = sitemaps.len() as u64;
        if actual_count != expected_count {
            errors.push(format!(
                "Expected {} sitemaps to be processed but {} were processed",
                expected_count, actual_count
            ));
        }
    }

    for expected_url in &validations.expected_sitemap_urls {
        if !sitemaps.contains_key(expected_url) {
            errors.push(format!(
                "Expected sitemap url={} to have been processed",
                expected_url
            ));
        }
    }

    for expected_page in &validations.expected_pages {
        let Some(collected) = pages.get(&expected_page.url) else {
            errors.push(format!(
                "Expected page url={} to have been collected",
                expected_page.url
            ));
            continue;
        };

        // changefreq and priority are checked independently; both can fail
        // for the same entry
        if expected_page.changefreq != collected.changefreq {
            errors.push(format!(
                "Page url={} changefreq mismatch, expected={} actual={}",
                expected_page.url,
                display_value(&expected_page.changefreq),
                display_value(&collected.changefreq)
            ));
        }

        if expected_page.priority != collected.priority {
            errors.push(format!(
                "Page url={} priority mismatch, expected={} actual={}",
                expected_page.url,
                display_value(&expected_page.priority),
                display_value(&collected.priority)
            ));
        }
    }

    errors
}

fn display_value(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<not set>")
}
