//! Report sink
//!
//! Consumes the final error list and the two outcome maps once per run,
//! emitting a console summary and a machine-readable `results.json` in the
//! configured results folder.

use crate::crawler::{PageRecord, SitemapOutcome};
use crate::SentinelError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The machine-readable report written to `results.json`
#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    pub generated_at: String,
    pub sitemaps: &'a BTreeMap<String, SitemapOutcome>,
    pub urls: &'a BTreeMap<String, PageRecord>,
    pub errors: &'a [String],
}

/// Emits the console summary and the JSON report, returning the JSON path
pub fn emit_reports(
    errors: &[String],
    sitemaps: &BTreeMap<String, SitemapOutcome>,
    pages: &BTreeMap<String, PageRecord>,
    results_folder: &Path,
) -> Result<PathBuf, SentinelError> {
    tracing::info!("Sitemap validation completed, generating reports");
    emit_console_report(errors, sitemaps, pages);
    emit_json_report(errors, sitemaps, pages, results_folder)
}

/// Logs the run summary
pub fn emit_console_report(
    errors: &[String],
    sitemaps: &BTreeMap<String, SitemapOutcome>,
    pages: &BTreeMap<String, PageRecord>,
) {
    tracing::info!("-----------------------------------------------");
    tracing::info!("Summary");
    tracing::info!("-----------------------------------------------");
    tracing::info!("Processed sitemaps        = {}", sitemaps.len());
    tracing::info!("Collected urls            = {}", pages.len());
    if errors.is_empty() {
        tracing::info!("Success - everything is good");
    } else {
        tracing::info!("Errors detected           = {}", errors.len());
        for error in errors {
            tracing::info!("  {}", error);
        }
    }
}

/// Writes `results.json` into the results folder, creating it if needed
pub fn emit_json_report(
    errors: &[String],
    sitemaps: &BTreeMap<String, SitemapOutcome>,
    pages: &BTreeMap<String, PageRecord>,
    results_folder: &Path,
) -> Result<PathBuf, SentinelError> {
    let report = ValidationReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        sitemaps,
        urls: pages,
        errors,
    };

    std::fs::create_dir_all(results_folder)?;
    let path = results_folder.join("results.json");
    let rendered = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, rendered)?;

    tracing::info!("Wrote report to {}", path.display());
    Ok(path)
}
