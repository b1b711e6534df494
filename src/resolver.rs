//! Website resolution cascade
//!
//! Drives the discovery strategies as an explicit state machine: domain
//! guessing first (cheapest, most precise), then registry filing mining
//! (needs a registry number), then text search (noisiest). The first
//! validated hit wins and no further strategies run - there is no
//! ranking across strategies.

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::discovery::{
    DiscoveryContext, DomainGuessStrategy, RegistryMiningStrategy, TextSearchStrategy,
};
use crate::fetch::PoliteFetcher;
use crate::website_validator::WebsiteValidator;

/// Resolution progress. `Resolved` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    NotStarted,
    TryingDomainGuess,
    TryingRegistryMining,
    TryingTextSearch,
    Resolved,
    Exhausted,
}

/// Which strategy produced the accepted URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    DomainGuess,
    RegistryMining,
    TextSearch,
}

impl std::fmt::Display for ResolvedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedVia::DomainGuess => write!(f, "domain_guess"),
            ResolvedVia::RegistryMining => write!(f, "registry_mining"),
            ResolvedVia::TextSearch => write!(f, "text_search"),
        }
    }
}

/// A successful resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub url: String,
    pub via: ResolvedVia,
}

pub struct WebsiteResolver {
    domain_guess: DomainGuessStrategy,
    registry_mining: RegistryMiningStrategy,
    text_search: TextSearchStrategy,
}

impl WebsiteResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            domain_guess: DomainGuessStrategy,
            registry_mining: RegistryMiningStrategy::new(&config.registry, &config.validation),
            text_search: TextSearchStrategy::new(&config.search),
        }
    }

    /// Walk the cascade for one company. Returns `None` when every
    /// strategy exhausted without a validated hit.
    pub async fn resolve(
        &self,
        fetcher: &PoliteFetcher,
        validator: &WebsiteValidator,
        company_name: &str,
        registry_number: Option<&str>,
    ) -> Option<Resolution> {
        let ctx = DiscoveryContext { fetcher, validator };
        let mut state = ResolveState::NotStarted;
        let mut resolution: Option<Resolution> = None;

        loop {
            state = match state {
                ResolveState::NotStarted => ResolveState::TryingDomainGuess,

                ResolveState::TryingDomainGuess => {
                    match self.domain_guess.attempt(&ctx, company_name).await {
                        Some(url) => {
                            resolution = Some(Resolution {
                                url,
                                via: ResolvedVia::DomainGuess,
                            });
                            ResolveState::Resolved
                        }
                        None => ResolveState::TryingRegistryMining,
                    }
                }

                ResolveState::TryingRegistryMining => match registry_number {
                    Some(number) if !number.is_empty() => {
                        match self.registry_mining.attempt(&ctx, company_name, number).await {
                            Some(url) => {
                                resolution = Some(Resolution {
                                    url,
                                    via: ResolvedVia::RegistryMining,
                                });
                                ResolveState::Resolved
                            }
                            None => ResolveState::TryingTextSearch,
                        }
                    }
                    _ => {
                        debug!("no registry number for '{}', skipping filing mining", company_name);
                        ResolveState::TryingTextSearch
                    }
                },

                ResolveState::TryingTextSearch => {
                    match self.text_search.attempt(&ctx, company_name).await {
                        Some(url) => {
                            resolution = Some(Resolution {
                                url,
                                via: ResolvedVia::TextSearch,
                            });
                            ResolveState::Resolved
                        }
                        None => ResolveState::Exhausted,
                    }
                }

                ResolveState::Resolved => {
                    if let Some(ref r) = resolution {
                        info!("resolved website for '{}' via {}: {}", company_name, r.via, r.url);
                    }
                    return resolution;
                }

                ResolveState::Exhausted => {
                    debug!("website resolution exhausted for '{}'", company_name);
                    return None;
                }
            };
        }
    }
}
