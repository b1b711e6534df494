//! Website discovery via registry filing mining
//!
//! Companies sometimes state their website in public filing documents.
//! This strategy pulls the filing-history page from the registry web UI,
//! regex-extracts anything that looks like a business domain, and runs
//! each distinct hit through the full two-tier validation.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::{RegistryConfig, ValidationConfig};
use crate::discovery::DiscoveryContext;

/// Most distinct domains content-checked per filing page
const MAX_CONTENT_CHECKS: usize = 5;

/// Strategy: mine business-domain URLs out of the filing-history page
pub struct RegistryMiningStrategy {
    registry: RegistryConfig,
    url_pattern: OnceCell<Regex>,
    accepted_suffixes: Vec<String>,
}

impl RegistryMiningStrategy {
    pub fn new(registry: &RegistryConfig, validation: &ValidationConfig) -> Self {
        Self {
            registry: registry.clone(),
            url_pattern: OnceCell::new(),
            accepted_suffixes: validation.accepted_suffixes.clone(),
        }
    }

    /// Business-domain pattern built from the configured suffixes,
    /// e.g. `https?://(?:www\.)?([a-zA-Z0-9-]+\.(?:co\.uk|com|org))`
    fn url_pattern(&self) -> &Regex {
        self.url_pattern.get_or_init(|| {
            let suffixes = self
                .accepted_suffixes
                .iter()
                .map(|s| regex::escape(s.trim_start_matches('.')))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"https?://(?:www\.)?([a-zA-Z0-9-]+\.(?:{}))", suffixes);
            // Suffixes are escaped literals; the pattern always compiles
            Regex::new(&pattern).unwrap_or_else(|_| Regex::new(r"^\b$").unwrap())
        })
    }

    /// Extract distinct candidate domains from raw page content
    pub fn extract_domains(&self, content: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut domains = Vec::new();
        for caps in self.url_pattern().captures_iter(content) {
            if let Some(domain) = caps.get(1) {
                let domain = domain.as_str().to_lowercase();
                if seen.insert(domain.clone()) {
                    domains.push(domain);
                }
            }
        }
        domains
    }

    pub async fn attempt(
        &self,
        ctx: &DiscoveryContext<'_>,
        company_name: &str,
        registry_number: &str,
    ) -> Option<String> {
        let filing_url = self.registry.filing_history_url(registry_number);
        let page = match ctx.fetcher.get(&filing_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("filing-history fetch failed for {}: {}", registry_number, e);
                return None;
            }
        };

        let domains = self.extract_domains(&page.text());
        debug!(
            "registry mining for {}: {} candidate domains",
            registry_number,
            domains.len()
        );

        let mut checked = 0;
        for domain in domains {
            let url = format!("https://www.{}", domain);

            let verdict = ctx.validator.validate_url(&url, company_name);
            if !verdict.valid {
                debug!("registry candidate {} rejected: {}", url, verdict.reason);
                continue;
            }

            if checked >= MAX_CONTENT_CHECKS {
                debug!("registry mining content-check budget exhausted");
                break;
            }
            checked += 1;

            if ctx.validator.confirm_business_site(ctx.fetcher, &url, company_name).await {
                info!("found website via registry filings: {}", url);
                return Some(url);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> RegistryMiningStrategy {
        let config: crate::config::AppConfig =
            toml::from_str(crate::config::DEFAULT_CONFIG).unwrap();
        RegistryMiningStrategy::new(&config.registry, &config.validation)
    }

    #[test]
    fn test_extracts_business_domains_from_page() {
        let s = strategy();
        let content = r#"
            <p>Contact us at https://www.acmewidgets.co.uk or see
            http://acmewidgets.com for details.</p>
            <a href="https://malicious.xyz/phish">ignore me</a>
        "#;
        let domains = s.extract_domains(content);
        assert_eq!(domains, vec!["acmewidgets.co.uk", "acmewidgets.com"]);
    }

    #[test]
    fn test_deduplicates_repeated_domains() {
        let s = strategy();
        let content = "https://www.acme.co.uk https://acme.co.uk http://www.acme.co.uk";
        assert_eq!(s.extract_domains(content), vec!["acme.co.uk"]);
    }

    #[test]
    fn test_ignores_unlisted_suffixes() {
        let s = strategy();
        let content = "https://www.acme.dev https://www.acme.io";
        assert!(s.extract_domains(content).is_empty());
    }
}
