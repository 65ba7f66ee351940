use serde::{Deserialize, Deserializer};

/// Main configuration structure for a validation run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logging level for the run (error, warn, info, debug or trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Root sitemap URLs to seed the crawl with
    pub sitemap_urls: Vec<String>,

    /// User-Agent header value sent with every request
    pub user_agent_for_requests: String,

    /// Pause between successive sitemap requests, in seconds
    pub delay_between_requests_in_seconds: f64,

    /// Directory the machine-readable reports are written to
    #[serde(default = "default_results_folder")]
    pub results_folder: String,

    /// Opt-in upper bound on sitemap processing attempts. Without it a
    /// cyclic sitemap-index graph never terminates; there is no visited
    /// set, a sitemap referenced twice is fetched twice.
    #[serde(default)]
    pub max_sitemap_fetches: Option<u64>,

    /// Optional expectations reconciled against the collected data
    #[serde(default)]
    pub validations: Option<Validations>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_results_folder() -> String {
    "results".to_string()
}

/// Expectations declared by the user, checked after the crawl completes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Validations {
    /// Exact number of sitemaps expected to have been processed
    #[serde(default)]
    pub expected_sitemap_count: Option<u64>,

    /// Sitemap URLs expected to appear among the processed sitemaps
    #[serde(default)]
    pub expected_sitemap_urls: Vec<String>,

    /// Page entries expected to match the collected records exactly
    #[serde(default)]
    pub expected_pages: Vec<ExpectedPage>,
}

/// One expected page entry: URL plus the metadata it must carry
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedPage {
    pub url: String,

    #[serde(default)]
    pub changefreq: Option<String>,

    /// Accepts a JSON number or string; carried as a string because
    /// collected priorities are kept verbatim as found in markup.
    #[serde(default, deserialize_with = "priority_as_string")]
    pub priority: Option<String>,
}

fn priority_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "priority must be a number or a string, got {other}"
        ))),
    }
}
