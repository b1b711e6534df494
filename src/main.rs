use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use companyenrich::cli::Cli;
use companyenrich::config::{self, AppConfig};
use companyenrich::enrich::EnrichmentOrchestrator;
use companyenrich::table::CompanyTable;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle --init first (before any other processing)
    if cli.init {
        match AppConfig::create_default_config() {
            Ok(path) => {
                println!("Created default configuration file at: {}", path.display());
                println!("Edit this file to customize settings, then run companyenrich again.");
                return Ok(());
            }
            Err(e) => {
                eprintln!("Failed to create configuration file: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(msg) = cli.validate() {
        eprintln!("Error: {}", msg);
        std::process::exit(1);
    }

    init_tracing(cli.verbose);

    // Load configuration, offering to create the default one interactively
    let mut app_config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(config::ConfigError::FileNotFound(path)) => {
            match AppConfig::prompt_create_config() {
                Ok(Some(created_path)) => {
                    println!("Created default configuration file at: {}", created_path.display());
                    println!("Edit this file to customize settings, then run companyenrich again.");
                    return Ok(());
                }
                Ok(None) => {
                    eprintln!("Configuration file not found at: {}", path.display());
                    eprintln!("Run with --init to create a default configuration file.");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Failed to create configuration file: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    apply_cli_overrides(&mut app_config, &cli);
    app_config
        .validate()
        .context("Configuration invalid after CLI overrides")?;

    let input = cli.input.clone().context("input path is required")?;
    let output = cli.output_path().context("output path is required")?;

    let orchestrator = EnrichmentOrchestrator::new(app_config)?;
    let years = orchestrator.years_of_interest();

    let mut table = CompanyTable::load(Path::new(&input), &years)?;
    if table.is_empty() {
        println!("No companies found in {}", input);
        return Ok(());
    }

    let stats = orchestrator
        .run(&mut table, Path::new(&output), cli.limit)
        .await?;

    println!(
        "Enrichment complete: {} processed, {} already complete, {} with nothing found.",
        stats.processed, stats.skipped_complete, stats.failed
    );
    println!("Results saved to {}", output);

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "companyenrich=info",
        1 => "companyenrich=debug",
        _ => "companyenrich=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(min) = cli.min_delay {
        config.politeness.min_delay_secs = min;
    }
    if let Some(max) = cli.max_delay {
        config.politeness.max_delay_secs = max;
    }
    if let Some(interval) = cli.checkpoint_interval {
        config.batch.checkpoint_interval = interval;
    }
}
