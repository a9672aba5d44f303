// src/relevance.rs
//! Region gate: plain case-insensitive substring match against a gazetteer.
//! No word boundaries on purpose ("Bengaluru" inside "#HackBengaluru2025" counts).

use once_cell::sync::Lazy;

/// Cities and regions that make a listing relevant for the India channel.
pub const INDIA_TERMS: &[&str] = &[
    "india",
    "bangalore",
    "bengaluru",
    "mumbai",
    "delhi",
    "pune",
    "hyderabad",
    "chennai",
    "kolkata",
    "ahmedabad",
    "jaipur",
    "gurgaon",
    "noida",
    "kerala",
    "goa",
    "lucknow",
];

static DEFAULT_GAZETTEER: Lazy<Gazetteer> = Lazy::new(Gazetteer::default);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gazetteer {
    terms: Vec<String>,
}

impl Gazetteer {
    /// Terms are trimmed, lower-cased and de-duplicated; blanks are dropped.
    pub fn with_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in terms {
            let t = t.as_ref().trim().to_lowercase();
            if !t.is_empty() && !out.contains(&t) {
                out.push(t);
            }
        }
        Self { terms: out }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        self.terms.iter().any(|t| lower.contains(t.as_str()))
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::with_terms(INDIA_TERMS)
    }
}

/// Does `text` mention the target region? Uses the built-in India gazetteer.
pub fn is_region_text(text: &str) -> bool {
    DEFAULT_GAZETTEER.matches(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_names_match_case_insensitively() {
        assert!(is_region_text("Hackathon in Bangalore"));
        assert!(is_region_text("NEW DELHI CODEFEST"));
        assert!(is_region_text("#HackBengaluru2025"));
    }

    #[test]
    fn global_listings_do_not_match() {
        assert!(!is_region_text("Global AI Challenge"));
        assert!(!is_region_text(""));
    }

    #[test]
    fn substring_match_is_intentional() {
        // "goa" inside "goal" is accepted: recall over precision.
        assert!(is_region_text("Zero Hunger Goal Jam"));
    }

    #[test]
    fn custom_terms_are_normalized() {
        let g = Gazetteer::with_terms([" Berlin ", "", "berlin", "MUNICH"]);
        assert_eq!(g.terms(), &["berlin".to_string(), "munich".to_string()]);
        assert!(g.matches("Hack Munich"));
        assert!(!g.matches("Hackathon in Bangalore"));
    }
}
