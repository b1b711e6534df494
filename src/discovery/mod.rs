//! Website discovery strategies
//!
//! Each strategy independently attempts to produce a validated official
//! website for a company. Strategies share one shape - an async
//! `attempt` returning `Option<String>` - so the resolver can walk them
//! in a fixed cascade and stop at the first hit.

pub mod domain_guess;
pub mod registry_filings;
pub mod text_search;

pub use domain_guess::{generate_candidates, DomainCandidate, DomainGuessStrategy};
pub use registry_filings::RegistryMiningStrategy;
pub use text_search::TextSearchStrategy;

use crate::fetch::PoliteFetcher;
use crate::website_validator::WebsiteValidator;

/// Shared read-only context handed to every strategy attempt
pub struct DiscoveryContext<'a> {
    pub fetcher: &'a PoliteFetcher,
    pub validator: &'a WebsiteValidator,
}
