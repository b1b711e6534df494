use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "companyenrich")]
#[command(about = "Batch enrichment of company records with website, description, headcount and registered address")]
#[command(version)]
pub struct Cli {
    /// Input CSV of company records (CompanyName column required)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output CSV path (defaults to <input stem>_enriched.csv)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Create default configuration file at ./config/companyenrich.toml
    #[arg(long)]
    pub init: bool,

    /// Verbose logging (use -v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Process only the first N not-yet-enriched records
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Minimum politeness delay in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub min_delay: Option<f64>,

    /// Maximum politeness delay in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub max_delay: Option<f64>,

    /// Records between checkpoint writes (overrides config)
    #[arg(long, value_name = "N")]
    pub checkpoint_interval: Option<usize>,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if !self.init {
            match &self.input {
                None => return Err("Input file is required (use --input, or --init to create a config)".to_string()),
                Some(path) if path.is_empty() => return Err("Input file cannot be empty".to_string()),
                _ => {}
            }
        }

        if let Some(limit) = self.limit {
            if limit == 0 {
                return Err("Limit must be greater than 0".to_string());
            }
        }

        if let Some(interval) = self.checkpoint_interval {
            if interval == 0 {
                return Err("Checkpoint interval must be greater than 0".to_string());
            }
        }

        if let (Some(min), Some(max)) = (self.min_delay, self.max_delay) {
            if min < 0.0 || max < min {
                return Err("Expected 0 <= min-delay <= max-delay".to_string());
            }
        }

        Ok(())
    }

    /// Output path, defaulting next to the input file
    pub fn output_path(&self) -> Option<String> {
        match (&self.output, &self.input) {
            (Some(output), _) => Some(output.clone()),
            (None, Some(input)) => Some(if input.ends_with(".csv") {
                input.replace(".csv", "_enriched.csv")
            } else {
                format!("{}_enriched.csv", input)
            }),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("companyenrich").chain(args.iter().copied()))
    }

    #[test]
    fn test_input_required_without_init() {
        assert!(cli(&[]).validate().is_err());
        assert!(cli(&["--init"]).validate().is_ok());
        assert!(cli(&["--input", "companies.csv"]).validate().is_ok());
    }

    #[test]
    fn test_output_defaults_from_input() {
        let c = cli(&["--input", "industrials.csv"]);
        assert_eq!(c.output_path().unwrap(), "industrials_enriched.csv");

        let c = cli(&["--input", "data", "--output", "out.csv"]);
        assert_eq!(c.output_path().unwrap(), "out.csv");
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(cli(&["--input", "a.csv", "--limit", "0"]).validate().is_err());
        assert!(cli(&["--input", "a.csv", "--limit", "3"]).validate().is_ok());
    }

    #[test]
    fn test_delay_override_ordering() {
        let c = cli(&["--input", "a.csv", "--min-delay", "5", "--max-delay", "2"]);
        assert!(c.validate().is_err());
    }
}
