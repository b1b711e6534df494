//! Per-record enrichment orchestration
//!
//! Owns the whole pipeline for one batch run: jurisdiction skip rules,
//! the website resolution cascade, description extraction with the
//! redundancy gate, filing mining, fill-empty merging and checkpointed
//! persistence. A failure inside one record costs that record's missing
//! fields, never the batch.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::describe::{sic_fallback_description, DescriptionExtractor};
use crate::fetch::PoliteFetcher;
use crate::filings::FilingMiner;
use crate::record::{CompanyRecord, EnrichmentResult};
use crate::resolver::WebsiteResolver;
use crate::table::CompanyTable;
use crate::website_validator::WebsiteValidator;

/// End-of-run statistics
#[derive(Debug, Clone)]
pub struct RunStats {
    pub total: usize,
    pub processed: usize,
    pub skipped_complete: usize,
    pub failed: usize,
}

pub struct EnrichmentOrchestrator {
    config: AppConfig,
    fetcher: PoliteFetcher,
    validator: WebsiteValidator,
    resolver: WebsiteResolver,
    describer: DescriptionExtractor,
    miner: FilingMiner,
}

impl EnrichmentOrchestrator {
    pub fn new(config: AppConfig) -> Result<Self> {
        let fetcher = PoliteFetcher::new(&config.http, &config.politeness)?;
        let validator = WebsiteValidator::new(&config.validation);
        let resolver = WebsiteResolver::new(&config);
        let describer = DescriptionExtractor::new(&config.description);
        let miner = FilingMiner::new(&config.mining, &config.registry)?;

        Ok(Self {
            config,
            fetcher,
            validator,
            resolver,
            describer,
            miner,
        })
    }

    /// Fiscal years this run mines and persists, most recent first
    pub fn years_of_interest(&self) -> Vec<u16> {
        self.miner.years_of_interest()
    }

    /// Process the whole table sequentially, checkpointing the output
    /// file every `checkpoint_interval` processed records and once more
    /// at the end.
    pub async fn run(
        &self,
        table: &mut CompanyTable,
        output: &Path,
        limit: Option<usize>,
    ) -> Result<RunStats> {
        let total = table.len();
        let budget = limit.unwrap_or(total);

        let progress = ProgressBar::new(total.min(budget) as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut stats = RunStats {
            total,
            processed: 0,
            skipped_complete: 0,
            failed: 0,
        };

        for index in 0..total {
            if stats.processed >= budget {
                break;
            }

            if table.is_fully_enriched(index) {
                debug!("row {} already fully enriched, skipping", index);
                stats.skipped_complete += 1;
                continue;
            }

            let record = table.record(index);
            if record.name.is_empty() {
                debug!("row {} has no company name, skipping", index);
                continue;
            }

            progress.set_message(record.name.clone());
            info!("processing: {}", record.name);

            let result = self.enrich_record(&record).await;
            if result.is_empty() {
                stats.failed += 1;
            }
            table.apply(index, &result);

            stats.processed += 1;
            progress.inc(1);

            if stats.processed % self.config.batch.checkpoint_interval == 0 {
                table.save(output)?;
                info!("checkpoint: {}/{} companies processed", stats.processed, total);
            }
        }

        table.save(output)?;
        progress.finish_with_message("done");

        self.log_fill_report(table);
        Ok(stats)
    }

    /// One record's enrichment. Best-effort throughout: whatever was
    /// found before a failure is returned, empty fields stand in for
    /// everything else.
    pub async fn enrich_record(&self, record: &CompanyRecord) -> EnrichmentResult {
        let mut result = EnrichmentResult::default();

        // Known foreign-manufacturer prefixes never have a locally
        // discoverable site; only the registry address is worth a request
        if self.is_skipped_name(&record.name) {
            info!("skipping website resolution for: {}", record.name);
            if let Some(number) = record.registry_number() {
                if let Some(address) = self
                    .miner
                    .fetch_registered_address(&self.fetcher, number)
                    .await
                {
                    result.registered_address = address;
                }
            }
            return result;
        }

        match self
            .resolver
            .resolve(
                &self.fetcher,
                &self.validator,
                &record.name,
                record.registry_number(),
            )
            .await
        {
            Some(resolution) => {
                result.website_url = resolution.url.clone();

                if let Some(description) =
                    self.describer.extract(&self.fetcher, &resolution.url).await
                {
                    if self
                        .describer
                        .is_redundant_with_sic(&description, &record.sic_codes)
                    {
                        debug!("description for {} rejected as SIC restatement", record.name);
                    } else {
                        result.description = description;
                    }
                }
            }
            None => {
                debug!("no website resolved for {}", record.name);
            }
        }

        // Filing mining is independent of website resolution
        if let Some(number) = record.registry_number() {
            let mined = self.miner.mine(&self.fetcher, number).await;
            result.employees_by_year = mined.employees_by_year;
            result.registered_address = mined.registered_address;
        }

        // Synthesized fallback only when no scraped description survived
        if result.description.is_empty() {
            if let Some(fallback) = sic_fallback_description(&record.sic_codes) {
                result.description = fallback;
            }
        }

        if result.is_empty() {
            warn!("no enrichment found for: {}", record.name);
        }

        result
    }

    fn is_skipped_name(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        self.config
            .batch
            .skip_name_prefixes
            .iter()
            .any(|p| upper.starts_with(p.as_str()))
    }

    fn log_fill_report(&self, table: &CompanyTable) {
        let total = table.len().max(1);
        for (column, filled) in table.fill_counts() {
            info!(
                "{}: {}/{} ({:.1}%) filled",
                column,
                filled,
                table.len(),
                filled as f64 / total as f64 * 100.0
            );
        }
    }
}
