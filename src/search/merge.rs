//! Client-side merging of exact-phrase and word-set results.

use serde::{Deserialize, Serialize};

use crate::model::LetterId;

/// Score multiplier for results confirmed by the exact-phrase pass.
pub const EXACT_BOOST: f64 = 1.5;

/// One ranked search result, in the shape the search endpoint returns
/// (`{id, title, sender, receiver, score, excerpt}`) plus the client-side
/// exact-match flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: LetterId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub receiver: String,
    pub score: f64,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub is_exact_match: bool,
}

/// Merge the two result sets.
///
/// Exact-phrase hits keep their identity with the score boosted by
/// [`EXACT_BOOST`]; word hits join only when no exact hit exists for the
/// same letter. Ordered descending by score; ties keep insertion order
/// (exact hits before word hits).
pub fn merge(exact: Vec<SearchHit>, words: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut merged: Vec<SearchHit> = Vec::with_capacity(exact.len() + words.len());

    for mut hit in exact {
        hit.score *= EXACT_BOOST;
        hit.is_exact_match = true;
        merged.push(hit);
    }

    for mut hit in words {
        if merged.iter().any(|m| m.id == hit.id) {
            continue;
        }
        hit.is_exact_match = false;
        merged.push(hit);
    }

    merged.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged
}
