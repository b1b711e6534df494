//! Website discovery via text search
//!
//! Last resort in the cascade: query an HTML results-page search endpoint
//! with the company name plus a negative filter for known non-business
//! sites, then harvest result links. Search results are the noisiest
//! signal source, so candidates additionally need a URL confidence above
//! the configured search threshold before the content check is spent.

use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SearchConfig;
use crate::discovery::DiscoveryContext;

/// Most result links content-checked per query
const MAX_CONTENT_CHECKS: usize = 5;

/// Strategy: filtered text search over an HTML results page
pub struct TextSearchStrategy {
    search: SearchConfig,
}

impl TextSearchStrategy {
    pub fn new(search: &SearchConfig) -> Self {
        Self {
            search: search.clone(),
        }
    }

    fn query_url(&self, company_name: &str) -> String {
        let query = format!("{} {}", company_name, self.search.query_suffix);
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}/?q={}", self.search.base_url.trim_end_matches('/'), encoded)
    }

    /// Pull candidate result URLs out of a results page, in document
    /// order. Handles both redirect-style links (`uddg=` query param)
    /// and plain absolute links.
    pub fn extract_result_urls(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let anchor = match Selector::parse("a[href]") {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };
        let base = Url::parse(&self.search.base_url).ok();

        let mut urls = Vec::new();
        for element in document.select(&anchor) {
            let href = match element.value().attr("href") {
                Some(h) => h,
                None => continue,
            };

            // Redirect link: the real target is percent-encoded in `uddg`
            if href.contains("uddg=") {
                let resolved = match &base {
                    Some(b) => b.join(href).ok(),
                    None => Url::parse(href).ok(),
                };
                if let Some(resolved) = resolved {
                    if let Some((_, target)) =
                        resolved.query_pairs().find(|(k, _)| k.as_ref() == "uddg")
                    {
                        if target.starts_with("http") {
                            urls.push(target.into_owned());
                        }
                    }
                }
                continue;
            }

            if href.starts_with("http://") || href.starts_with("https://") {
                urls.push(href.to_string());
            }
        }
        urls
    }

    pub async fn attempt(&self, ctx: &DiscoveryContext<'_>, company_name: &str) -> Option<String> {
        let query_url = self.query_url(company_name);
        let page = match ctx.fetcher.get(&query_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("search fetch failed for '{}': {}", company_name, e);
                return None;
            }
        };

        let candidates = self.extract_result_urls(&page.text());
        debug!(
            "text search for '{}': {} result links",
            company_name,
            candidates.len()
        );

        let mut checked = 0;
        for url in candidates {
            let verdict = ctx.validator.validate_url(&url, company_name);
            if !verdict.valid {
                debug!("search result {} rejected: {}", url, verdict.reason);
                continue;
            }
            if verdict.confidence < ctx.validator.search_confidence_min() {
                debug!(
                    "search result {} below confidence threshold ({})",
                    url, verdict.confidence
                );
                continue;
            }

            if checked >= MAX_CONTENT_CHECKS {
                debug!("text search content-check budget exhausted");
                break;
            }
            checked += 1;

            if ctx.validator.confirm_business_site(ctx.fetcher, &url, company_name).await {
                info!("found website via filtered search: {}", url);
                return Some(url);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> TextSearchStrategy {
        let config: crate::config::AppConfig =
            toml::from_str(crate::config::DEFAULT_CONFIG).unwrap();
        TextSearchStrategy::new(&config.search)
    }

    #[test]
    fn test_query_url_is_encoded() {
        let s = strategy();
        let url = s.query_url("Acme & Sons Ltd");
        assert!(url.contains("q=Acme+%26+Sons+Ltd"));
        assert!(url.contains("-linkedin"));
    }

    #[test]
    fn test_extracts_redirect_links() {
        let s = strategy();
        let html = r#"
        <html><body>
            <a href="/l/?uddg=https%3A%2F%2Fwww.acmemanufacturing.co.uk%2F&rut=abc">Acme</a>
            <a href="/l/?uddg=https%3A%2F%2Fwww.linkedin.com%2Fcompany%2Facme">LinkedIn</a>
        </body></html>
        "#;
        let urls = s.extract_result_urls(html);
        assert_eq!(
            urls,
            vec![
                "https://www.acmemanufacturing.co.uk/",
                "https://www.linkedin.com/company/acme",
            ]
        );
    }

    #[test]
    fn test_extracts_plain_absolute_links() {
        let s = strategy();
        let html = r#"<a href="https://www.acme.co.uk">Acme</a><a href="/internal">skip</a>"#;
        assert_eq!(s.extract_result_urls(html), vec!["https://www.acme.co.uk"]);
    }

    #[test]
    fn test_non_http_uddg_target_skipped() {
        let s = strategy();
        let html = r#"<a href="/l/?uddg=javascript%3Aalert(1)">bad</a>"#;
        assert!(s.extract_result_urls(html).is_empty());
    }
}
