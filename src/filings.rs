//! Registry filing mining
//!
//! Extracts per-year headcounts from annual-accounts filings and the
//! registered office address from the company detail page of the public
//! registry web UI. Every sub-extraction is independently best-effort:
//! a filing that fails to fetch or parse costs nothing but its own data.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::{MiningConfig, RegistryConfig};
use crate::doc_text::extract_text;
use crate::fetch::PoliteFetcher;

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"20(\d{2})").unwrap());

/// One entry of the filing-history listing; consumed immediately
#[derive(Debug, Clone, PartialEq)]
pub struct FilingReference {
    pub fiscal_year: u16,
    pub document_link: String,
    pub description: String,
}

/// Everything the miner can produce for one company
#[derive(Debug, Clone, Default)]
pub struct MinedFilings {
    pub employees_by_year: BTreeMap<u16, u32>,
    pub registered_address: String,
}

pub struct FilingMiner {
    config: MiningConfig,
    registry: RegistryConfig,
    patterns: Vec<Regex>,
}

impl FilingMiner {
    pub fn new(config: &MiningConfig, registry: &RegistryConfig) -> anyhow::Result<Self> {
        Ok(Self {
            patterns: config.compiled_patterns()?,
            config: config.clone(),
            registry: registry.clone(),
        })
    }

    /// The trailing window of fiscal years mined, most recent first,
    /// anchored at the current UTC year.
    pub fn years_of_interest(&self) -> Vec<u16> {
        let current = Utc::now().year() as u16;
        (0..self.config.trailing_year_window as u16)
            .map(|offset| current - offset)
            .collect()
    }

    /// Mine headcounts and the registered address for one company.
    pub async fn mine(&self, fetcher: &PoliteFetcher, registry_number: &str) -> MinedFilings {
        let mut result = MinedFilings::default();

        self.mine_employee_counts(fetcher, registry_number, &mut result).await;

        if let Some(address) = self.fetch_registered_address(fetcher, registry_number).await {
            result.registered_address = address;
        }

        result
    }

    async fn mine_employee_counts(
        &self,
        fetcher: &PoliteFetcher,
        registry_number: &str,
        result: &mut MinedFilings,
    ) {
        let filing_url = self.registry.filing_history_url(registry_number);
        let page = match fetcher.get(&filing_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("filing history fetch failed for {}: {}", registry_number, e);
                return;
            }
        };

        let years = self.years_of_interest();
        let filings = self.parse_filing_references(&page.text(), &years);
        debug!(
            "{}: {} annual-accounts filings in the trailing window",
            registry_number,
            filings.len()
        );

        for filing in filings.into_iter().take(self.config.max_filings) {
            if result.employees_by_year.contains_key(&filing.fiscal_year) {
                continue;
            }

            info!(
                "checking {} accounts for {}",
                filing.fiscal_year, registry_number
            );
            let document_url = self.registry.document_url(&filing.document_link);
            let document = match fetcher.get_document(&document_url).await {
                Ok(doc) => doc,
                Err(e) => {
                    debug!("filing document fetch failed: {}", e);
                    continue;
                }
            };

            let text = extract_text(
                &document.bytes,
                &document.content_type,
                self.config.max_pdf_pages,
            );
            if let Some(count) = self.mine_employee_count(&text) {
                result.employees_by_year.insert(filing.fiscal_year, count);
            }
        }
    }

    /// Parse annual-accounts entries out of the filing-history listing.
    /// The registry UI has shipped both item-block and table-row markup;
    /// both are recognized.
    pub fn parse_filing_references(&self, html: &str, years: &[u16]) -> Vec<FilingReference> {
        let document = Html::parse_document(html);
        let mut filings = Vec::new();

        self.parse_item_blocks(&document, years, &mut filings);
        if filings.is_empty() {
            self.parse_table_rows(&document, years, &mut filings);
        }

        filings
    }

    fn parse_item_blocks(&self, document: &Html, years: &[u16], out: &mut Vec<FilingReference>) {
        let item = match Selector::parse("div.filing-history-item") {
            Ok(s) => s,
            Err(_) => return,
        };
        let heading = Selector::parse("h3").ok();
        let time = Selector::parse("time").ok();
        let anchor = Selector::parse("a[href]").ok();
        let (heading, time, anchor) = match (heading, time, anchor) {
            (Some(h), Some(t), Some(a)) => (h, t, a),
            _ => return,
        };

        for element in document.select(&item) {
            let description = match element.select(&heading).next() {
                Some(h) => h.text().collect::<String>(),
                None => continue,
            };
            if !description.to_lowercase().contains("annual accounts") {
                continue;
            }

            let date_text = element
                .select(&time)
                .next()
                .map(|t| {
                    t.value()
                        .attr("datetime")
                        .map(str::to_string)
                        .unwrap_or_else(|| t.text().collect::<String>())
                })
                .unwrap_or_default();

            let link = element.select(&anchor).find_map(|a| {
                let label = a.text().collect::<String>();
                if label.contains("View PDF") || label.contains("Download") {
                    a.value().attr("href").map(str::to_string)
                } else {
                    None
                }
            });

            if let (Some(link), Some(year)) =
                (link, extract_fiscal_year(&format!("{} {}", date_text, description), years))
            {
                out.push(FilingReference {
                    fiscal_year: year,
                    document_link: link,
                    description: description.trim().to_string(),
                });
            }
        }
    }

    fn parse_table_rows(&self, document: &Html, years: &[u16], out: &mut Vec<FilingReference>) {
        let row = match Selector::parse("tr") {
            Ok(s) => s,
            Err(_) => return,
        };
        let cell = match Selector::parse("td") {
            Ok(s) => s,
            Err(_) => return,
        };
        let anchor = match Selector::parse("a[href]") {
            Ok(s) => s,
            Err(_) => return,
        };

        for element in document.select(&row) {
            let cells: Vec<String> = element
                .select(&cell)
                .map(|c| c.text().collect::<String>())
                .collect();
            let description = match cells.first() {
                Some(d) => d.clone(),
                None => continue,
            };
            if !description.to_lowercase().contains("annual accounts") {
                continue;
            }

            let date_text = cells.get(1).cloned().unwrap_or_default();
            let link = element
                .select(&anchor)
                .next()
                .and_then(|a| a.value().attr("href").map(str::to_string));

            if let (Some(link), Some(year)) =
                (link, extract_fiscal_year(&format!("{} {}", date_text, description), years))
            {
                out.push(FilingReference {
                    fiscal_year: year,
                    document_link: link,
                    description: description.trim().to_string(),
                });
            }
        }
    }

    /// Run the ordered pattern list over extracted text; the first
    /// numeric match inside the plausibility bound wins. Out-of-bound
    /// matches are skipped, not fatal - totals and turnover figures
    /// regularly collide with these patterns.
    pub fn mine_employee_count(&self, text: &str) -> Option<u32> {
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let Some(raw) = caps.get(1) else { continue };
                let Ok(count) = raw.as_str().parse::<u32>() else {
                    continue;
                };
                if count >= self.config.employee_min && count <= self.config.employee_max {
                    return Some(count);
                }
                debug!("discarding implausible employee count {}", count);
            }
        }
        None
    }

    /// Registered office address from the company detail page.
    pub async fn fetch_registered_address(
        &self,
        fetcher: &PoliteFetcher,
        registry_number: &str,
    ) -> Option<String> {
        let url = self.registry.company_url(registry_number);
        let page = match fetcher.get(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("company page fetch failed for {}: {}", registry_number, e);
                return None;
            }
        };

        parse_registered_address(&page.text())
    }
}

/// Extract the registered-office-address block, caption stripped and
/// whitespace-normalized.
pub fn parse_registered_address(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("div#company-addresses").ok()?;
    let section = document.select(&selector).next()?;

    let text = section.text().collect::<String>();
    let text = text.replace("Registered office address", "");
    let address = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if address.is_empty() {
        None
    } else {
        Some(address)
    }
}

/// Fiscal year via the trailing-two-digit pattern anchored to the 2000s,
/// restricted to the window of interest.
fn extract_fiscal_year(text: &str, years: &[u16]) -> Option<u16> {
    for caps in YEAR_PATTERN.captures_iter(text) {
        if let Ok(tail) = caps[1].parse::<u16>() {
            let year = 2000 + tail;
            if years.contains(&year) {
                return Some(year);
            }
        }
    }
    None
}
