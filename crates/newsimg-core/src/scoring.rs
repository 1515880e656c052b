//! Candidate ranking.
//!
//! `score = license_multiplier * license_weight
//!        + min(width, height) / resolution_divisor
//!        + term_hits
//!        + provider_bonus`
//!
//! With the default policy the license term spans 0..15 points while the
//! resolution term stays near 1-2 for typical web images, so a low-resolution
//! public-domain image outranks a large non-commercial one.

use crate::policy::ScoringPolicy;
use crate::types::ImageCandidate;

/// Normalize a provider license code.
///
/// The public-domain mark variants (`pdm`, `public-domain`, `publicdomain`,
/// `public domain`) collapse to `"public-domain"`; everything else is trimmed
/// and lower-cased.
#[must_use]
pub fn normalize_license(raw: &str) -> String {
    let lic = raw.trim().to_lowercase();
    match lic.as_str() {
        "pdm" | "public-domain" | "publicdomain" | "public domain" => "public-domain".to_string(),
        _ => lic,
    }
}

/// Relevance of a candidate to the query terms: 2 per term found in the
/// title, else 1 per term found in the title or tags.
fn term_hits(candidate: &ImageCandidate, terms: &[String]) -> f64 {
    let title = candidate.title.to_lowercase();
    let text = format!("{} {}", title, candidate.tags.join(" ").to_lowercase());
    let hits: u32 = terms
        .iter()
        .map(|t| {
            let t = t.to_lowercase();
            if title.contains(&t) {
                2
            } else if text.contains(&t) {
                1
            } else {
                0
            }
        })
        .sum();
    f64::from(hits)
}

/// Score one candidate against the query terms. Higher is better.
#[must_use]
pub fn score_candidate(candidate: &ImageCandidate, terms: &[String], policy: &ScoringPolicy) -> f64 {
    let license = normalize_license(&candidate.license);
    let license_score = policy.license_multiplier * policy.license_weight(&license);

    let min_side = candidate
        .width
        .unwrap_or(0)
        .min(candidate.height.unwrap_or(0));
    let resolution_score = f64::from(min_side) / policy.resolution_divisor;

    let provider_bonus = if policy.is_bonus_provider(&candidate.provider) {
        policy.provider_bonus
    } else {
        0.0
    };

    license_score + resolution_score + term_hits(candidate, terms) + provider_bonus
}

/// Pick the best candidate. Returns its index and score.
///
/// Among candidates sharing the top score the earliest one in `candidates`
/// wins, so provider order breaks ties.
#[must_use]
pub fn select_best(
    candidates: &[ImageCandidate],
    terms: &[String],
    policy: &ScoringPolicy,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let score = score_candidate(candidate, terms, policy);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best
}
