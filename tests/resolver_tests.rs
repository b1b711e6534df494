//! Website resolution cascade against mocked endpoints

mod common;

use common::fixtures::{business_site_html, search_results_html};
use common::wiremock_helpers::{mount_error, mount_html};
use common::test_config;
use companyenrich::fetch::PoliteFetcher;
use companyenrich::resolver::{ResolvedVia, WebsiteResolver};
use companyenrich::website_validator::WebsiteValidator;
use wiremock::MockServer;

#[tokio::test]
async fn exhausts_when_search_results_all_fail_validation() {
    let search = MockServer::start().await;
    // Results: a denylisted host and one with zero name-token overlap
    mount_html(
        &search,
        "/",
        &search_results_html(&[
            "https://www.linkedin.com/company/an-od-eg",
            "https://www.unrelatedwidgets.co.uk/",
        ]),
    )
    .await;

    let mut config = test_config();
    config.search.base_url = search.uri();

    let fetcher = PoliteFetcher::new(&config.http, &config.politeness).unwrap();
    let validator = WebsiteValidator::new(&config.validation);
    let resolver = WebsiteResolver::new(&config);

    // Name produces no domain candidates, and there is no registry
    // number, so the cascade falls straight through to text search
    let resolution = resolver
        .resolve(&fetcher, &validator, "An Od Eg Limited", None)
        .await;

    assert!(resolution.is_none());
}

#[tokio::test]
async fn exhausts_when_search_endpoint_is_down() {
    let search = MockServer::start().await;
    mount_error(&search, 503).await;

    let mut config = test_config();
    config.search.base_url = search.uri();

    let fetcher = PoliteFetcher::new(&config.http, &config.politeness).unwrap();
    let validator = WebsiteValidator::new(&config.validation);
    let resolver = WebsiteResolver::new(&config);

    let resolution = resolver
        .resolve(&fetcher, &validator, "An Od Eg Limited", None)
        .await;

    assert!(resolution.is_none());
}

#[tokio::test]
async fn accepts_first_search_hit_passing_both_tiers() {
    // Candidate site and search endpoint live on the same mock server;
    // the acceptance policy is widened so a loopback host can pass the
    // URL tier (suffix allowlist and thresholds are config, not code)
    let server = MockServer::start().await;
    let site_url = format!("{}/site", server.uri());

    mount_html(&server, "/", &search_results_html(&[&site_url])).await;
    mount_html(&server, "/site", &business_site_html("An Od Eg")).await;

    let mut config = test_config();
    config.search.base_url = server.uri();
    config.validation.accepted_suffixes.push("0.1".to_string());
    config.validation.search_confidence_min = 40;
    config.validation.name_token_min = 0;

    let fetcher = PoliteFetcher::new(&config.http, &config.politeness).unwrap();
    let validator = WebsiteValidator::new(&config.validation);
    let resolver = WebsiteResolver::new(&config);

    let resolution = resolver
        .resolve(&fetcher, &validator, "An Od Eg Limited", None)
        .await
        .expect("search hit should resolve");

    assert_eq!(resolution.url, site_url);
    assert_eq!(resolution.via, ResolvedVia::TextSearch);
}
