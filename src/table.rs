//! Company table persistence
//!
//! The whole input CSV is held in memory for the duration of a batch.
//! Columns the pipeline does not understand pass through untouched;
//! enrichment columns are appended when missing. Every save is a full
//! rewrite of the destination path through a temp file and atomic
//! rename, so an interrupt mid-write cannot corrupt the last checkpoint.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::record::{CompanyRecord, EnrichmentResult};

/// Input column names (companies-registry bulk export format)
pub const NAME_COLUMN: &str = "CompanyName";
pub const NUMBER_COLUMN: &str = "CompanyNumber";
pub const SIC_COLUMNS: [&str; 4] = [
    "SICCode.SicText_1",
    "SICCode.SicText_2",
    "SICCode.SicText_3",
    "SICCode.SicText_4",
];

/// Appended enrichment column names, besides the per-year ones
pub const WEBSITE_COLUMN: &str = "website_url";
pub const DESCRIPTION_COLUMN: &str = "description";
pub const ADDRESS_COLUMN: &str = "registered_address";

pub fn employees_column(year: u16) -> String {
    format!("employees_{}", year)
}

/// In-memory company table with stable column order
#[derive(Debug, Clone)]
pub struct CompanyTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Fiscal years carried as employees_<year> columns, most recent first
    years: Vec<u16>,
}

impl CompanyTable {
    /// Load a CSV table. The name column must exist; everything else is
    /// optional. Rows shorter than the header are padded.
    pub fn load(path: &Path, years: &[u16]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if !headers.iter().any(|h| h == NAME_COLUMN) {
            anyhow::bail!(
                "Input file has no '{}' column: {}",
                NAME_COLUMN,
                path.display()
            );
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("Failed to parse CSV record")?;
            let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        let mut table = Self {
            headers,
            rows,
            years: years.to_vec(),
        };
        table.ensure_enrichment_columns();

        info!("loaded {} companies from {}", table.len(), path.display());
        Ok(table)
    }

    /// Append any missing enrichment columns and pad all rows to match.
    fn ensure_enrichment_columns(&mut self) {
        let mut wanted: Vec<String> = vec![WEBSITE_COLUMN.to_string(), DESCRIPTION_COLUMN.to_string()];
        wanted.extend(self.years.iter().map(|y| employees_column(*y)));
        wanted.push(ADDRESS_COLUMN.to_string());

        for column in wanted {
            if !self.headers.iter().any(|h| *h == column) {
                self.headers.push(column);
            }
        }
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn years(&self) -> &[u16] {
        &self.years
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> &str {
        self.column_index(column)
            .and_then(|i| self.rows.get(row).and_then(|r| r.get(i)))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn set_cell_if_empty(&mut self, row: usize, column: &str, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        if let Some(i) = self.column_index(column) {
            if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(i)) {
                if cell.trim().is_empty() {
                    *cell = value.trim().to_string();
                }
            }
        }
    }

    /// The pipeline's view of one row. Pandas-style 'nan' artifacts in
    /// the number column are treated as absent.
    pub fn record(&self, row: usize) -> CompanyRecord {
        let number = self.cell(row, NUMBER_COLUMN).trim();
        let registry_number = match number {
            "" | "nan" => None,
            n => Some(n.to_string()),
        };

        let sic_codes = SIC_COLUMNS
            .iter()
            .map(|c| self.cell(row, c).trim())
            .filter(|s| !s.is_empty() && *s != "nan")
            .map(str::to_string)
            .collect();

        CompanyRecord {
            name: self.cell(row, NAME_COLUMN).trim().to_string(),
            registry_number,
            sic_codes,
        }
    }

    /// Fill-empty merge: a freshly found value lands only where the cell
    /// is still empty. Never overwrites previously filled data.
    pub fn apply(&mut self, row: usize, result: &EnrichmentResult) {
        self.set_cell_if_empty(row, WEBSITE_COLUMN, &result.website_url);
        self.set_cell_if_empty(row, DESCRIPTION_COLUMN, &result.description);
        for year in self.years.clone() {
            if let Some(count) = result.employees_for(year) {
                self.set_cell_if_empty(row, &employees_column(year), &count.to_string());
            }
        }
        self.set_cell_if_empty(row, ADDRESS_COLUMN, &result.registered_address);
    }

    /// Whether every enrichment column of this row is already filled,
    /// making re-processing pointless.
    pub fn is_fully_enriched(&self, row: usize) -> bool {
        let mut columns: Vec<String> = vec![WEBSITE_COLUMN.to_string(), DESCRIPTION_COLUMN.to_string()];
        columns.extend(self.years.iter().map(|y| employees_column(*y)));
        columns.push(ADDRESS_COLUMN.to_string());

        columns
            .iter()
            .all(|c| !self.cell(row, c).trim().is_empty())
    }

    /// Full-table rewrite through a temp file and atomic rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!("writing {} rows to {}", self.len(), path.display());

        let temp_path = path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&temp_path)
                .with_context(|| format!("Failed to create output file: {}", temp_path.display()))?;
            writer.write_record(&self.headers)?;
            for row in &self.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move output into place: {}", path.display()))?;
        Ok(())
    }

    /// Non-empty cell count per enrichment column, for the end-of-run
    /// fill report.
    pub fn fill_counts(&self) -> Vec<(String, usize)> {
        let mut columns: Vec<String> = vec![WEBSITE_COLUMN.to_string(), DESCRIPTION_COLUMN.to_string()];
        columns.extend(self.years.iter().map(|y| employees_column(*y)));
        columns.push(ADDRESS_COLUMN.to_string());

        columns
            .into_iter()
            .map(|c| {
                let filled = (0..self.len())
                    .filter(|&i| !self.cell(i, &c).trim().is_empty())
                    .count();
                (c, filled)
            })
            .collect()
    }
}
