//! Website acceptance gates
//!
//! Two-tier validation of a candidate URL as "this company's official
//! site". Tier one is a cheap URL-level plausibility check (scheme,
//! denylist, business suffix, name-token overlap). Tier two fetches the
//! page and requires business-indicator vocabulary plus the company name
//! in the visible text. Domain matching alone accepts parked domains and
//! similarly named unrelated firms; the content check is the expensive
//! but decisive filter, so it only runs after the cheap one passes.

use scraper::Html;
use tracing::debug;
use url::Url;

use crate::company_name::NameCleaner;
use crate::config::ValidationConfig;
use crate::fetch::PoliteFetcher;

/// Outcome of a URL-level validation. Never persisted; gates acceptance only.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlVerdict {
    pub valid: bool,
    pub reason: String,
    /// Heuristic acceptance strength 0-100, not a calibrated probability
    pub confidence: u32,
}

impl UrlVerdict {
    fn reject(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            confidence: 0,
        }
    }

    fn accept(confidence: u32) -> Self {
        Self {
            valid: true,
            reason: String::new(),
            confidence,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebsiteValidator {
    config: ValidationConfig,
    cleaner: NameCleaner,
}

impl WebsiteValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            config: config.clone(),
            cleaner: NameCleaner::new(&config.legal_suffixes),
        }
    }

    pub fn cleaner(&self) -> &NameCleaner {
        &self.cleaner
    }

    /// URL-level plausibility check, short-circuiting on the first failure.
    pub fn validate_url(&self, url: &str, company_name: &str) -> UrlVerdict {
        if url.is_empty() || !(url.starts_with("http://") || url.starts_with("https://")) {
            return UrlVerdict::reject("Invalid URL format");
        }

        let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
            Some(h) => h,
            None => return UrlVerdict::reject("Invalid URL format"),
        };

        // Substring match is deliberate: over-broad rejection is preferred
        // to false acceptance
        if let Some(blocked) = self.config.denied_hosts.iter().find(|b| host.contains(b.as_str())) {
            return UrlVerdict::reject(format!("Blacklisted domain: {} (matched '{}')", host, blocked));
        }

        if !self
            .config
            .accepted_suffixes
            .iter()
            .any(|s| host.ends_with(s.as_str()))
        {
            return UrlVerdict::reject("Non-business domain extension");
        }

        let tokens = self.cleaner.significant_tokens(company_name, 2);
        let matched = tokens.iter().filter(|t| host.contains(t.as_str())).count();

        if matched == 0 && !tokens.is_empty() {
            return UrlVerdict::reject("No company name match in domain");
        }

        UrlVerdict::accept((40 + 30 * matched as u32).min(100))
    }

    /// Content-level confirmation: fetch the page and require business
    /// vocabulary and the company name in the visible text.
    pub async fn confirm_business_site(
        &self,
        fetcher: &PoliteFetcher,
        url: &str,
        company_name: &str,
    ) -> bool {
        let page = match fetcher.get(url).await {
            Ok(page) => page,
            Err(e) => {
                debug!("content check fetch failed for {}: {}", url, e);
                return false;
            }
        };

        self.page_has_business_signals(&page.text(), company_name)
    }

    /// The pure half of the content check, over already-fetched HTML.
    pub fn page_has_business_signals(&self, html: &str, company_name: &str) -> bool {
        let document = Html::parse_document(html);
        let text = document
            .root_element()
            .text()
            .collect::<String>()
            .to_lowercase();

        let keyword_hits = self
            .config
            .business_keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count();

        // Longer threshold than the URL check: page prose is noisier
        let name_hits = self
            .cleaner
            .significant_tokens(company_name, 3)
            .iter()
            .filter(|t| text.contains(t.as_str()))
            .count();

        let confirmed = keyword_hits >= self.config.business_keyword_min
            && name_hits >= self.config.name_token_min;
        debug!(
            "business signals for {}: {} keywords, {} name tokens -> {}",
            company_name, keyword_hits, name_hits, confirmed
        );
        confirmed
    }

    /// Minimum confidence additionally required of text-search results
    pub fn search_confidence_min(&self) -> u32 {
        self.config.search_confidence_min
    }
}
