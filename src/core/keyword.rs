//! Keyword gate for the document-search path.
//!
//! The gate is the only routing decision ahead of the agents: a query that
//! mentions a scheme term goes to the information agent first, everything
//! else goes straight to web research. Matching is literal and
//! case-insensitive — no NLU is involved, by design.

/// Fixed scheme vocabulary for the gate.
///
/// A query containing any of these terms (case-insensitive) is eligible
/// for the document-search path.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "medishield",
    "benefit",
    "coverage",
    "premium",
    "payment",
    "policy",
    "subsidies",
    "deductible",
    "claim",
    "co-insurance",
    "exclusions",
    "insurance",
    "healthcare",
    "protection",
    "hospital",
    "ward",
    "outpatient",
    "surgery",
    "treatment",
    "pro-ration",
    "withdrawal",
    "limit",
];

/// A set of gate keywords, lowercased at construction.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    /// Creates a keyword set from arbitrary terms.
    ///
    /// Terms are lowercased; empty or whitespace-only terms are dropped so
    /// they can never match every query.
    #[must_use]
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// The compiled-in scheme vocabulary.
    #[must_use]
    pub fn default_vocabulary() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }

    /// Returns the lowercased terms in this set.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Returns `true` if this set contains no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns `true` if the query contains at least one term.
    ///
    /// Case-insensitive substring match. Pure, deterministic, and total:
    /// an empty or malformed query simply returns `false`.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return false;
        }
        let lowered = query.to_lowercase();
        self.terms.iter().any(|t| lowered.contains(t.as_str()))
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::default_vocabulary()
    }
}

/// Evaluates the gate: `true` iff the query contains a configured keyword.
#[must_use]
pub fn evaluate(query: &str, keywords: &KeywordSet) -> bool {
    keywords.matches(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("What is the claim process for Medishield?", true; "claim keyword")]
    #[test_case("How much is the premium?", true; "premium keyword")]
    #[test_case("MEDISHIELD coverage details", true; "uppercase match")]
    #[test_case("hello", false; "greeting only")]
    #[test_case("what is the weather today", false; "unrelated query")]
    #[test_case("", false; "empty query")]
    #[test_case("   ", false; "whitespace query")]
    fn test_gate_decisions(query: &str, expected: bool) {
        let keywords = KeywordSet::default_vocabulary();
        assert_eq!(evaluate(query, &keywords), expected);
    }

    #[test]
    fn test_hyphenated_terms_match() {
        let keywords = KeywordSet::default_vocabulary();
        assert!(evaluate("what about co-insurance and pro-ration?", &keywords));
    }

    #[test]
    fn test_empty_terms_dropped() {
        let keywords = KeywordSet::new(["", "  ", "ward"]);
        assert_eq!(keywords.terms().len(), 1);
        assert!(!keywords.matches("anything at all"));
        assert!(keywords.matches("which ward am I in"));
    }

    #[test]
    fn test_empty_set_never_matches() {
        let keywords = KeywordSet::new(Vec::<String>::new());
        assert!(keywords.is_empty());
        assert!(!keywords.matches("medishield claim premium"));
    }

    #[test]
    fn test_default_vocabulary_size() {
        let keywords = KeywordSet::default_vocabulary();
        assert_eq!(keywords.terms().len(), DEFAULT_KEYWORDS.len());
    }

    proptest! {
        /// Any query that embeds a vocabulary term must pass the gate,
        /// regardless of surrounding text or casing.
        #[test]
        fn prop_embedded_keyword_always_matches(
            prefix in "[a-z ?!.]{0,40}",
            suffix in "[a-z ?!.]{0,40}",
            idx in 0..DEFAULT_KEYWORDS.len(),
            upper in proptest::bool::ANY,
        ) {
            let term = DEFAULT_KEYWORDS[idx];
            let term = if upper { term.to_uppercase() } else { term.to_string() };
            let query = format!("{prefix}{term}{suffix}");
            let keywords = KeywordSet::default_vocabulary();
            prop_assert!(evaluate(&query, &keywords));
        }

        /// The gate never panics on arbitrary input.
        #[test]
        fn prop_gate_is_total(query in "\\PC*") {
            let keywords = KeywordSet::default_vocabulary();
            let _ = evaluate(&query, &keywords);
        }
    }
}
