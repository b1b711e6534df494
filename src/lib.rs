// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod cli;
pub mod company_name;
pub mod config;
pub mod describe;
pub mod discovery;
pub mod doc_text;
pub mod enrich;
pub mod fetch;
pub mod filings;
pub mod record;
pub mod resolver;
pub mod table;
pub mod website_validator;

pub use enrich::EnrichmentOrchestrator;
pub use record::{CompanyRecord, EnrichmentResult};
pub use table::CompanyTable;
