//! Company description extraction
//!
//! Ordered fallback over an accepted website: meta description first,
//! then structural "about" regions, then the first substantial paragraph.
//! A post-hoc redundancy gate keeps mechanically generated SIC
//! restatements from being recorded as organically scraped content. The
//! SIC-derived fallback itself is still legitimate - it just must only
//! apply when no scrape succeeded.

use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::DescriptionConfig;
use crate::fetch::PoliteFetcher;

/// Structural selectors associated with company-description regions,
/// in the order they are scanned
const ABOUT_SELECTORS: &[&str] = &[
    r#"section[class*="about"]"#,
    r#"div[class*="about"]"#,
    ".company-description",
    ".business-description",
    r#"div[id*="about"]"#,
    r#"section[id*="about"]"#,
];

#[derive(Debug, Clone)]
pub struct DescriptionExtractor {
    config: DescriptionConfig,
}

impl DescriptionExtractor {
    pub fn new(config: &DescriptionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Fetch the page and run the extraction cascade. Empty result on
    /// any failure - a missing description is data, not an error.
    pub async fn extract(&self, fetcher: &PoliteFetcher, url: &str) -> Option<String> {
        let page = match fetcher.get(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("description fetch failed for {}: {}", url, e);
                return None;
            }
        };
        self.extract_from_html(&page.text())
    }

    /// The pure extraction cascade over already-fetched HTML
    pub fn extract_from_html(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        if let Some(desc) = self.from_meta_description(&document) {
            debug!("description via meta tag");
            return Some(desc);
        }

        if let Some(desc) = self.from_about_region(&document) {
            debug!("description via about region");
            return Some(desc);
        }

        if let Some(desc) = self.from_first_paragraph(&document) {
            debug!("description via first paragraph");
            return Some(desc);
        }

        None
    }

    fn from_meta_description(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
        let content = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))?
            .trim();

        if content.len() <= 20 {
            return None;
        }
        let lowered = content.to_lowercase();
        if self
            .config
            .greeting_prefixes
            .iter()
            .any(|p| lowered.starts_with(p.as_str()))
        {
            return None;
        }

        Some(self.truncate(content))
    }

    fn from_about_region(&self, document: &Html) -> Option<String> {
        for selector_str in ABOUT_SELECTORS {
            let selector = match Selector::parse(selector_str) {
                Ok(s) => s,
                Err(_) => continue,
            };
            for element in document.select(&selector) {
                let text = normalize_whitespace(&element.text().collect::<String>());
                if text.len() > 50 && text.len() < 1000 {
                    return Some(self.truncate(&text));
                }
            }
        }
        None
    }

    fn from_first_paragraph(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("p").ok()?;
        for element in document.select(&selector) {
            let text = normalize_whitespace(&element.text().collect::<String>());
            if text.len() > 50 && text.len() < 500 {
                return Some(text);
            }
        }
        None
    }

    fn truncate(&self, text: &str) -> String {
        text.chars().take(self.config.max_len).collect()
    }

    /// Rejects descriptions that are a near-restatement of the SIC
    /// classification text. Only mechanically prefixed descriptions are
    /// suspect; an organically scraped paragraph passes regardless.
    pub fn is_redundant_with_sic(&self, description: &str, sic_codes: &[String]) -> bool {
        if !description.starts_with("Company engaged in") {
            return false;
        }

        let sic_text = sic_codes.join(" ").to_lowercase();
        let sic_words: HashSet<&str> = sic_text.split_whitespace().collect();

        let core = description
            .trim_start_matches("Company engaged in")
            .trim()
            .to_lowercase();
        let shared = core
            .split_whitespace()
            .collect::<HashSet<&str>>()
            .intersection(&sic_words)
            .count();

        shared > self.config.sic_overlap_max
    }
}

/// Synthesize a description from the first classification text of the
/// form "NN.NN - Some activity". Applied only when no scraped
/// description survived validation.
pub fn sic_fallback_description(sic_codes: &[String]) -> Option<String> {
    for sic in sic_codes {
        if let Some((_, activity)) = sic.split_once(" - ") {
            return Some(format!("Company engaged in {}", activity.to_lowercase()));
        }
    }
    None
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DescriptionExtractor {
        let config: crate::config::AppConfig =
            toml::from_str(crate::config::DEFAULT_CONFIG).unwrap();
        DescriptionExtractor::new(&config.description)
    }

    #[test]
    fn test_meta_description_preferred() {
        let html = r#"<html><head>
            <meta name="description" content="Precision widget manufacturing for aerospace and rail.">
        </head><body><p>Some long paragraph that is definitely over fifty characters in length.</p></body></html>"#;
        let desc = extractor().extract_from_html(html).unwrap();
        assert_eq!(desc, "Precision widget manufacturing for aerospace and rail.");
    }

    #[test]
    fn test_short_or_greeting_meta_falls_through() {
        let html = r#"<html><head>
            <meta name="description" content="Welcome to Acme Widgets, the home of fine widgets on the web.">
        </head><body>
            <div class="about-us">Acme Widgets has manufactured precision widgets in Sheffield since 1952, supplying aerospace and rail.</div>
        </body></html>"#;
        let desc = extractor().extract_from_html(html).unwrap();
        assert!(desc.starts_with("Acme Widgets has manufactured"));
    }

    #[test]
    fn test_paragraph_fallback_with_length_bounds() {
        let html = r#"<html><body>
            <p>Too short.</p>
            <p>We design and build bespoke conveyor systems for food processing plants across the United Kingdom.</p>
        </body></html>"#;
        let desc = extractor().extract_from_html(html).unwrap();
        assert!(desc.starts_with("We design and build"));
    }

    #[test]
    fn test_no_usable_content_yields_none() {
        let html = "<html><body><p>Hi.</p></body></html>";
        assert!(extractor().extract_from_html(html).is_none());
    }

    #[test]
    fn test_about_region_whitespace_normalized() {
        let html = r#"<html><body>
            <section class="about">
                Acme   Widgets
                builds    precision   tooling for the automotive sector,
                with   in-house   design and   machining.
            </section>
        </body></html>"#;
        let desc = extractor().extract_from_html(html).unwrap();
        assert!(!desc.contains("  "));
        assert!(desc.contains("Acme Widgets builds precision tooling"));
    }

    #[test]
    fn test_truncation_to_max_len() {
        let long_body = "x".repeat(900);
        let html = format!(
            r#"<html><head><meta name="description" content="{}"></head></html>"#,
            long_body
        );
        let desc = extractor().extract_from_html(&html).unwrap();
        assert_eq!(desc.chars().count(), 500);
    }

    #[test]
    fn test_sic_restatement_rejected() {
        let e = extractor();
        let sic = vec!["10.11 - Processing and preserving of meat products".to_string()];
        let synthetic = "Company engaged in processing and preserving of meat products";
        assert!(e.is_redundant_with_sic(synthetic, &sic));
    }

    #[test]
    fn test_organic_description_passes_redundancy_gate() {
        let e = extractor();
        let sic = vec!["10.11 - Processing and preserving of meat products".to_string()];
        let organic = "Family butchers supplying restaurants across Yorkshire since 1962.";
        assert!(!e.is_redundant_with_sic(organic, &sic));
    }

    #[test]
    fn test_low_overlap_engaged_in_description_passes() {
        let e = extractor();
        let sic = vec!["28.22 - Manufacture of lifting equipment".to_string()];
        // Starts with the suspect prefix but shares few words with the SIC text
        let desc = "Company engaged in bespoke crane hire across Scotland";
        assert!(!e.is_redundant_with_sic(desc, &sic));
    }

    #[test]
    fn test_sic_fallback_description() {
        let sic = vec![
            "".to_string(),
            "10.11 - Processing of meat".to_string(),
        ];
        assert_eq!(
            sic_fallback_description(&sic).unwrap(),
            "Company engaged in processing of meat"
        );
        assert!(sic_fallback_description(&["no separator".to_string()]).is_none());
        assert!(sic_fallback_description(&[]).is_none());
    }
}
