//! Search query formulation
//!
//! Deterministic text transform from a claim to a search query. No I/O.
//! Claims carrying numbers or dates search best verbatim; otherwise fall back
//! to capitalized keywords, then to a truncated prefix of the claim.

use regex::Regex;
use std::sync::OnceLock;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d+(?:\.\d+)?(?:\s*(?:million|billion|trillion|percent|%|thousand))?")
            .expect("invalid number regex")
    })
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:19|20)\d{2}\b|\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b")
            .expect("invalid date regex")
    })
}

/// Formulate a web search query for a claim.
///
/// Policy:
/// - claim contains a number-like token or a date: use the claim verbatim
/// - else: up to 3 capitalized words longer than 4 characters
/// - else: first 100 characters of the claim
pub fn formulate(claim: &str) -> String {
    if number_re().is_match(claim) || date_re().is_match(claim) {
        return claim.to_string();
    }

    let key_terms: Vec<&str> = claim
        .split_whitespace()
        .filter(|w| w.chars().count() > 4 && w.chars().next().is_some_and(char::is_uppercase))
        .take(3)
        .collect();

    if !key_terms.is_empty() {
        key_terms.join(" ")
    } else {
        claim.chars().take(100).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_with_percentage_used_verbatim() {
        let claim = "Revenue grew 45% in 2023.";
        assert_eq!(formulate(claim), claim);
    }

    #[test]
    fn test_claim_with_year_used_verbatim() {
        let claim = "The treaty was signed in 1998 after long negotiations.";
        assert_eq!(formulate(claim), claim);
    }

    #[test]
    fn test_claim_with_written_date_used_verbatim() {
        let claim = "The merger closed on March 15, 2021 per the filing.";
        assert_eq!(formulate(claim), claim);
    }

    #[test]
    fn test_claim_with_magnitude_word_used_verbatim() {
        let claim = "The company raised 3.5 billion dollars.";
        assert_eq!(formulate(claim), claim);
    }

    #[test]
    fn test_capitalized_keywords_extracted() {
        let claim = "Tesla produces electric Vehicles in Germany and elsewhere";
        assert_eq!(formulate(claim), "Tesla Vehicles Germany");
    }

    #[test]
    fn test_at_most_three_keywords() {
        let claim = "Apple Google Microsoft Amazon compete fiercely";
        assert_eq!(formulate(claim), "Apple Google Microsoft");
    }

    #[test]
    fn test_short_capitalized_words_ignored() {
        // All capitalized words here are <= 4 chars, so none qualify
        let claim = "The Blue Bird Flew Away over the quiet hills of the old countryside town";
        assert_eq!(formulate(claim), claim.chars().take(100).collect::<String>());
    }

    #[test]
    fn test_plain_claim_truncated_to_100_chars() {
        let claim = "the quick brown fox jumps over the lazy dog again and again and again \
                     and keeps on jumping until it gets tired of jumping";
        let query = formulate(claim);
        assert_eq!(query, claim.chars().take(100).collect::<String>());
        assert_eq!(query.chars().count(), 100);
    }

    #[test]
    fn test_deterministic() {
        let claim = "Mercury orbits closest to the Sun";
        assert_eq!(formulate(claim), formulate(claim));
    }
}
