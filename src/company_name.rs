//! Company name normalization
//!
//! Legal-suffix stripping and tokenization shared by the domain candidate
//! generator and the website validator. Both must clean names identically
//! or the validator will reject domains the generator produced.

use once_cell::sync::Lazy;
use regex::Regex;

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Strips configured legal-entity suffixes from company names
#[derive(Debug, Clone)]
pub struct NameCleaner {
    suffix_re: Regex,
}

impl NameCleaner {
    /// Build from the configured suffix list. Longer suffixes are matched
    /// first so "CO., LTD" wins over its "LTD" substring.
    pub fn new(legal_suffixes: &[String]) -> Self {
        let mut suffixes: Vec<&str> = legal_suffixes.iter().map(|s| s.as_str()).collect();
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));

        let alternation = suffixes
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        // Empty suffix list degenerates to a never-matching pattern
        let pattern = if alternation.is_empty() {
            r"\bZZZ_NO_SUFFIXES\b".to_string()
        } else {
            format!(r"(?i)\b(?:{})\b\.?", alternation)
        };

        Self {
            // Pattern is built from escaped literals; cannot fail to compile
            suffix_re: Regex::new(&pattern).unwrap_or_else(|_| Regex::new(r"\bZZZ\b").unwrap()),
        }
    }

    /// Lowercased name with legal suffixes and punctuation removed
    pub fn clean(&self, name: &str) -> String {
        let stripped = self.suffix_re.replace_all(name, "");
        let despeckled = PUNCTUATION.replace_all(&stripped, " ");
        despeckled.trim().to_lowercase()
    }

    /// Tokens of the cleaned name longer than `min_len` characters.
    /// Short tokens are too generic to disambiguate a domain.
    pub fn significant_tokens(&self, name: &str, min_len: usize) -> Vec<String> {
        self.clean(name)
            .split_whitespace()
            .filter(|w| w.chars().count() > min_len)
            .map(|w| w.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> NameCleaner {
        NameCleaner::new(&[
            "LIMITED".to_string(),
            "LTD".to_string(),
            "CO., LTD".to_string(),
            "PLC".to_string(),
        ])
    }

    #[test]
    fn test_strips_legal_suffixes_case_insensitively() {
        let c = cleaner();
        assert_eq!(c.clean("Bright Widgets Limited"), "bright widgets");
        assert_eq!(c.clean("ACME LTD"), "acme");
        assert_eq!(c.clean("Acme ltd."), "acme");
    }

    #[test]
    fn test_compound_suffix_wins_over_substring() {
        let c = cleaner();
        assert_eq!(c.clean("Shenzhen Gadget Co., Ltd"), "shenzhen gadget");
    }

    #[test]
    fn test_punctuation_becomes_spaces() {
        let c = cleaner();
        let tokens = c.significant_tokens("Smith & Jones (Holdings) Limited", 2);
        assert_eq!(tokens, vec!["smith", "jones", "holdings"]);
    }

    #[test]
    fn test_significant_tokens_drop_short_words() {
        let c = cleaner();
        let tokens = c.significant_tokens("A B C Limited", 2);
        assert!(tokens.is_empty());

        let tokens = c.significant_tokens("Acme Manufacturing Ltd", 2);
        assert_eq!(tokens, vec!["acme", "manufacturing"]);
    }

    #[test]
    fn test_suffix_not_stripped_mid_word() {
        let c = cleaner();
        // "Maltd" contains "ltd" but not on a word boundary
        assert_eq!(c.clean("Maltd Systems"), "maltd systems");
    }

    #[test]
    fn test_tokens_deterministic() {
        let c = cleaner();
        let a = c.significant_tokens("Bright Widgets Limited", 2);
        let b = c.significant_tokens("Bright Widgets Limited", 2);
        assert_eq!(a, b);
    }
}
