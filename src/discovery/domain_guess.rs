//! Direct domain construction and probing
//!
//! Derives plausible domains purely from the company name, then probes
//! each with a HEAD request. A full two-word match is more discriminating
//! than a single generic word, so concatenated two-token candidates come
//! first and single-token ones last.

use tracing::{debug, info};

use crate::company_name::NameCleaner;
use crate::discovery::DiscoveryContext;

/// Most candidates probed per company, to bound request volume
pub const MAX_CANDIDATES: usize = 4;

/// A generated domain guess; priority is generation order
#[derive(Debug, Clone, PartialEq)]
pub struct DomainCandidate {
    pub domain: String,
    pub scheme: String,
}

impl DomainCandidate {
    fn new(domain: String) -> Self {
        Self {
            domain,
            scheme: "https".to_string(),
        }
    }

    /// Probe URL for this candidate
    pub fn url(&self) -> String {
        format!("{}://www.{}", self.scheme, self.domain)
    }
}

/// Pure candidate generation: no I/O, deterministic, at most
/// [`MAX_CANDIDATES`] entries in priority order.
pub fn generate_candidates(cleaner: &NameCleaner, company_name: &str) -> Vec<DomainCandidate> {
    let words = cleaner.significant_tokens(company_name, 2);
    if words.is_empty() {
        return Vec::new();
    }

    let mut domains: Vec<String> = Vec::new();
    if words.len() >= 2 {
        domains.push(format!("{}{}.co.uk", words[0], words[1]));
        domains.push(format!("{}-{}.co.uk", words[0], words[1]));
        domains.push(format!("{}{}.com", words[0], words[1]));
        if words.len() >= 3 {
            domains.push(format!("{}{}{}.co.uk", words[0], words[1], words[2]));
        }
    }
    domains.push(format!("{}.co.uk", words[0]));
    domains.push(format!("{}.com", words[0]));

    domains.dedup();
    domains
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(DomainCandidate::new)
        .collect()
}

/// Strategy: construct likely domains and probe them in order
pub struct DomainGuessStrategy;

impl DomainGuessStrategy {
    pub async fn attempt(&self, ctx: &DiscoveryContext<'_>, company_name: &str) -> Option<String> {
        let candidates = generate_candidates(ctx.validator.cleaner(), company_name);
        debug!(
            "domain guessing for '{}': {} candidates",
            company_name,
            candidates.len()
        );

        for candidate in candidates {
            let url = candidate.url();

            if let Err(e) = ctx.fetcher.probe(&url).await {
                debug!("probe failed for {}: {}", url, e);
                continue;
            }

            if !ctx.validator.confirm_business_site(ctx.fetcher, &url, company_name).await {
                debug!("content check rejected {}", url);
                continue;
            }

            let verdict = ctx.validator.validate_url(&url, company_name);
            if !verdict.valid {
                debug!("url check rejected {}: {}", url, verdict.reason);
                continue;
            }

            info!("found website via domain construction: {}", url);
            return Some(url);
        }

        None
    }
}
