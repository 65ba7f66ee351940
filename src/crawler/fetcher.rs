//! HTTP fetcher implementation
//!
//! One GET per sitemap URL, classified into success-with-body, non-200
//! status, or transport failure. There is no retry; a failed URL is simply
//! recorded and the crawl moves on.

use reqwest::Client;

/// Result of fetching one sitemap URL
#[derive(Debug)]
pub enum FetchResult {
    /// 200 response; body bytes exactly as served
    Body { body: String },

    /// Response arrived with a status other than 200
    HttpStatus(u16),

    /// Connection-level failure before a status was obtained
    TransportError { message: String },
}

/// Builds the HTTP client used for the whole run
///
/// Certificate verification is intentionally relaxed so hierarchies behind
/// self-signed certificates can still be validated, and response compression
/// is disabled so the schema validator sees body bytes exactly as served.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .danger_accept_invalid_certs(true)
        .no_gzip()
        .build()
}

/// Fetches a sitemap URL with a single GET attempt
pub async fn fetch_sitemap(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            if status != 200 {
                return FetchResult::HttpStatus(status);
            }
            match response.text().await {
                Ok(body) => FetchResult::Body { body },
                Err(e) => FetchResult::TransportError {
                    message: format!("failed reading response body: {}", e),
                },
            }
        }
        Err(e) => {
            let message = if e.is_timeout() {
                format!("request timeout: {}", e)
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                e.to_string()
            };
            FetchResult::TransportError { message }
        }
    }
}
