//! Integration tests for the crawl-validate-reconcile pipeline
//!
//! These tests use wiremock to serve sitemap hierarchies and exercise the
//! full pipeline end-to-end: traversal order, outcome recording, schema
//! gating, and expectation reconciliation.

use sitemap_sentinel::config::{Config, ExpectedPage, Validations};
use sitemap_sentinel::crawler::{Crawler, SitemapOutcome};
use sitemap_sentinel::expectations::reconcile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration seeded with the given root sitemap URLs
fn test_config(roots: Vec<String>) -> Config {
    Config {
        log_level: "info".to_string(),
        sitemap_urls: roots,
        user_agent_for_requests: "sentinel-test/1.0".to_string(),
        delay_between_requests_in_seconds: 0.0,
        results_folder: "results".to_string(),
        max_sitemap_fetches: None,
        validations: None,
    }
}

/// Renders a schema-valid sitemap-index document
fn index_body(children: &[&str]) -> String {
    let entries: String = children
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

/// Renders a schema-valid urlset document from (loc, changefreq, priority)
fn urlset_body(entries: &[(&str, Option<&str>, Option<&str>)]) -> String {
    let rendered: String = entries
        .iter()
        .map(|(loc, changefreq, priority)| {
            let mut url = format!("<url><loc>{}</loc>", loc);
            if let Some(changefreq) = changefreq {
                url.push_str(&format!("<changefreq>{}</changefreq>", changefreq));
            }
            if let Some(priority) = priority {
                url.push_str(&format!("<priority>{}</priority>", priority));
            }
            url.push_str("</url>");
            url
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        rendered
    )
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_index_with_two_urlsets_collects_union_of_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        index_body(&[
            &format!("{}/sitemap-a.xml", base),
            &format!("{}/sitemap-b.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-a.xml",
        urlset_body(&[
            (&format!("{}/page-a1", base), Some("daily"), Some("0.8")),
            (&format!("{}/page-a2", base), None, None),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-b.xml",
        urlset_body(&[(&format!("{}/page-b1", base), Some("weekly"), None)]),
    )
    .await;

    let config = test_config(vec![format!("{}/sitemap.xml", base)]);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.sitemaps.len(), 3);
    assert!(outcome.sitemaps.values().all(SitemapOutcome::is_success));
    assert_eq!(outcome.pages.len(), 3);
    assert!(outcome.errors.is_empty());

    let record = &outcome.pages[&format!("{}/page-a1", base)];
    assert_eq!(record.changefreq.as_deref(), Some("daily"));
    assert_eq!(record.priority.as_deref(), Some("0.8"));

    let errors = reconcile(None, &outcome.sitemaps, &outcome.pages);
    assert!(errors.is_empty());
}

#[tokio::test]
async fn test_duplicate_page_url_last_processed_sitemap_wins() {
    let server = MockServer::start().await;
    let base = server.uri();
    let shared = format!("{}/shared-page", base);

    // The index lists sitemap-a before sitemap-b. Children are pushed in
    // document order and popped last-in-first-out, so sitemap-b is
    // processed first and sitemap-a last; sitemap-a's values must win.
    mount_xml(
        &server,
        "/sitemap.xml",
        index_body(&[
            &format!("{}/sitemap-a.xml", base),
            &format!("{}/sitemap-b.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-a.xml",
        urlset_body(&[(&shared, Some("daily"), Some("0.5"))]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-b.xml",
        urlset_body(&[(&shared, Some("weekly"), Some("0.9"))]),
    )
    .await;

    let config = test_config(vec![format!("{}/sitemap.xml", base)]);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.pages.len(), 1);
    let record = &outcome.pages[&shared];
    assert_eq!(record.changefreq.as_deref(), Some("daily"));
    assert_eq!(record.priority.as_deref(), Some("0.5"));
}

#[tokio::test]
async fn test_missing_child_is_recorded_as_404_and_reported() {
    let server = MockServer::start().await;
    let base = server.uri();

    // /missing.xml has no mock mounted, so the server answers 404
    mount_xml(
        &server,
        "/sitemap.xml",
        index_body(&[&format!("{}/missing.xml", base)]),
    )
    .await;

    let config = test_config(vec![format!("{}/sitemap.xml", base)]);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(
        outcome.sitemaps[&format!("{}/missing.xml", base)],
        SitemapOutcome::HttpStatus(404)
    );
    assert!(outcome.pages.is_empty());

    let errors = reconcile(None, &outcome.sitemaps, &outcome.pages);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(&format!("{}/missing.xml", base)));
    assert!(errors[0].contains("404"));
}

#[tokio::test]
async fn test_unreachable_root_is_recorded_as_transport_failure() {
    // Port 9 (discard) is not listening locally
    let root = "http://127.0.0.1:9/sitemap.xml".to_string();
    let config = test_config(vec![root.clone()]);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.sitemaps[&root], SitemapOutcome::TransportFailure);

    let errors = reconcile(None, &outcome.sitemaps, &outcome.pages);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("returned Failed instead of 200"));
}

#[tokio::test]
async fn test_non_xml_body_is_recorded_as_parse_failure() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        "just some plain text, not xml".to_string(),
    )
    .await;

    let config = test_config(vec![format!("{}/sitemap.xml", base)]);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(
        outcome.sitemaps[&format!("{}/sitemap.xml", base)],
        SitemapOutcome::XmlParseFailure
    );
    assert!(outcome.pages.is_empty());
}

#[tokio::test]
async fn test_unvalidatable_document_keeps_200_and_reports_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Well-formed XML but neither schema's markers match
    mount_xml(
        &server,
        "/sitemap.xml",
        r#"<rss version="2.0"><channel></channel></rss>"#.to_string(),
    )
    .await;

    let config = test_config(vec![format!("{}/sitemap.xml", base)]);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(
        outcome.sitemaps[&format!("{}/sitemap.xml", base)],
        SitemapOutcome::HttpStatus(200)
    );
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("cannot be validated"));
}

#[tokio::test]
async fn test_schema_violations_block_child_extraction() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Index with one good entry and one entry missing its <loc>: the
    // document fails validation, so the referenced child is never fetched.
    let invalid_index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{}/sitemap-a.xml</loc></sitemap>
  <sitemap></sitemap>
</sitemapindex>"#,
        base
    );
    mount_xml(&server, "/sitemap.xml", invalid_index).await;
    mount_xml(
        &server,
        "/sitemap-a.xml",
        urlset_body(&[(&format!("{}/page-a1", base), None, None)]),
    )
    .await;

    let config = test_config(vec![format!("{}/sitemap.xml", base)]);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.sitemaps.len(), 1, "child must not have been fetched");
    assert_eq!(
        outcome.sitemaps[&format!("{}/sitemap.xml", base)],
        SitemapOutcome::HttpStatus(200)
    );
    assert!(outcome
        .errors
        .iter()
        .any(|e| e.contains("missing required <loc>")));
}

#[tokio::test]
async fn test_duplicate_sitemap_reference_is_fetched_twice() {
    let server = MockServer::start().await;
    let base = server.uri();
    let child = format!("{}/sitemap-a.xml", base);

    mount_xml(&server, "/sitemap.xml", index_body(&[&child, &child])).await;
    Mock::given(method("GET"))
        .and(path("/sitemap-a.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(urlset_body(&[(&format!("{}/page-a1", base), None, None)])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(vec![format!("{}/sitemap.xml", base)]);
    let outcome = Crawler::new(config).unwrap().run().await;

    // Two attempts, one map entry: the second attempt overwrote the first
    assert_eq!(outcome.sitemaps.len(), 2);
    assert_eq!(outcome.sitemaps[&child], SitemapOutcome::HttpStatus(200));
}

#[tokio::test]
async fn test_cyclic_index_is_bounded_by_max_sitemap_fetches() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap-a.xml",
        index_body(&[&format!("{}/sitemap-b.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-b.xml",
        index_body(&[&format!("{}/sitemap-a.xml", base)]),
    )
    .await;

    let mut config = test_config(vec![format!("{}/sitemap-a.xml", base)]);
    config.max_sitemap_fetches = Some(5);

    let outcome = Crawler::new(config).unwrap().run().await;

    assert!(outcome
        .errors
        .iter()
        .any(|e| e.contains("stopped after 5 sitemap fetches")));
    // Both outcome entries are overwritten in place as the cycle repeats
    assert_eq!(outcome.sitemaps.len(), 2);
}

#[tokio::test]
async fn test_expectations_reconciled_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();
    let root = format!("{}/sitemap.xml", base);
    let page = format!("{}/page-a1", base);

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset_body(&[(&page, Some("weekly"), Some("0.8"))]),
    )
    .await;

    let mut config = test_config(vec![root.clone()]);
    config.validations = Some(Validations {
        expected_sitemap_count: Some(1),
        expected_sitemap_urls: vec![root.clone()],
        expected_pages: vec![ExpectedPage {
            url: page.clone(),
            changefreq: Some("daily".to_string()),
            priority: Some("0.8".to_string()),
        }],
    });

    let validations = config.validations.clone();
    let outcome = Crawler::new(config).unwrap().run().await;
    let errors = reconcile(validations.as_ref(), &outcome.sitemaps, &outcome.pages);

    // The only violation is the changefreq mismatch; the priority check
    // passes because "0.8" matches the collected string
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("changefreq mismatch"));
    assert!(errors[0].contains("expected=daily"));
    assert!(errors[0].contains("actual=weekly"));
}
