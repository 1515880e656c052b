//! Search-term extraction from story text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Default number of terms handed to the image search.
pub const DEFAULT_KEYWORD_LIMIT: usize = 6;

/// Tokens shorter than this many characters are dropped.
const MIN_TOKEN_CHARS: usize = 3;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9'’\-]+").expect("valid token regex"));

/// English function words that never make useful image queries.
pub(crate) const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "let", "me",
    "more", "most", "my", "myself", "nor", "of", "on", "once", "only", "or", "other", "our",
    "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "with", "you",
    "your", "yours", "yourself", "yourselves",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn keep(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_CHARS && !is_stopword(token)
}

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract up to `limit` search terms from a story.
///
/// Tokens come from the title, then the summary, then the tags (each tag is
/// one token). Terms are ordered by frequency; equal counts keep the order in
/// which they were first seen. Returns an empty list when nothing survives
/// filtering, in which case callers should search with the raw title.
#[must_use]
pub fn extract_keywords(
    title: &str,
    summary: Option<&str>,
    tags: &[String],
    limit: usize,
) -> Vec<String> {
    let mut tokens = tokenize(title);
    if let Some(summary) = summary {
        tokens.extend(tokenize(summary));
    }
    tokens.extend(
        tags.iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty()),
    );

    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for token in tokens.into_iter().filter(|t| keep(t)) {
        if let Some(&i) = index.get(&token) {
            order[i].1 += 1;
        } else {
            index.insert(token.clone(), order.len());
            order.push((token, 1));
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().take(limit).map(|(t, _)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn scenario_title_and_tags() {
        let got = extract_keywords(
            "Tor releases Snowflake update",
            Some(""),
            &tags(&["privacy", "tor"]),
            DEFAULT_KEYWORD_LIMIT,
        );
        assert_eq!(got, vec!["tor", "releases", "snowflake", "update", "privacy"]);
    }

    #[test]
    fn frequency_orders_terms() {
        let got = extract_keywords(
            "Censorship report",
            Some("censorship grows; censorship tools spread"),
            &[],
            3,
        );
        assert_eq!(got[0], "censorship");
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let got = extract_keywords("zeta alpha beta", None, &[], 10);
        assert_eq!(got, vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn stopwords_are_never_returned() {
        let got = extract_keywords(
            "What about their other theirs",
            Some("because yourselves"),
            &tags(&["the", "through"]),
            10,
        );
        assert!(got.is_empty(), "got {got:?}");
    }

    #[test]
    fn short_tokens_are_dropped() {
        let got = extract_keywords("AI vs ML on 5G", None, &tags(&["eu"]), 10);
        assert!(got.is_empty(), "got {got:?}");
    }

    #[test]
    fn output_never_exceeds_limit() {
        let title = "one two three four five six seven eight nine ten eleven twelve";
        for limit in 0..8 {
            assert!(extract_keywords(title, None, &[], limit).len() <= limit);
        }
    }

    #[test]
    fn keeps_hyphens_and_apostrophes_inside_tokens() {
        let got = extract_keywords("End-to-end encryption isn't optional", None, &[], 10);
        assert!(got.contains(&"end-to-end".to_string()), "got {got:?}");
        assert!(got.contains(&"isn't".to_string()), "got {got:?}");
    }

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(extract_keywords("", None, &[], DEFAULT_KEYWORD_LIMIT).is_empty());
    }

    #[test]
    fn tags_are_lowercased_whole() {
        let got = extract_keywords("", None, &tags(&["  Net Neutrality "]), 5);
        assert_eq!(got, vec!["net neutrality"]);
    }
}
