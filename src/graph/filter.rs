//! Year and degree filtering over a built network.
//!
//! Filtering never mutates a previous build's metrics; the year filter
//! operates on the record list before a rebuild, the degree filter on the
//! freshly built network.

use std::collections::BTreeSet;
use std::sync::Arc;

use hashbrown::HashSet;

use crate::model::LetterRecord;

use super::Network;

/// Rebuild parameters, captured from the UI controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    /// Selected years. Empty means "no year filter", never "exclude all".
    pub years: BTreeSet<i32>,
    /// Minimum entity degree; nodes below the threshold are dropped.
    pub min_degree: u64,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.years.insert(year);
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    pub fn with_min_degree(mut self, min_degree: u64) -> Self {
        self.min_degree = min_degree;
        self
    }
}

/// Records matching the year selection. An empty selection passes every
/// record through; a non-empty selection excludes records with no year.
pub fn by_years(
    records: &[Arc<LetterRecord>],
    years: &BTreeSet<i32>,
) -> Vec<Arc<LetterRecord>> {
    if years.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.year.is_some_and(|y| years.contains(&y)))
        .cloned()
        .collect()
}

/// Drop nodes below the degree threshold, then prune edges that lost an
/// endpoint. A loop survives as long as its single endpoint does.
pub fn apply_min_degree(network: &mut Network, min_degree: u64) {
    if min_degree == 0 {
        return;
    }

    let metrics = &network.metrics;
    network
        .nodes
        .retain(|node| metrics.degree_of(&node.id) >= min_degree);

    let remaining: HashSet<&str> =
        network.nodes.iter().map(|n| n.id.as_str()).collect();
    network.edges.retain(|edge| {
        remaining.contains(edge.source.as_str())
            && (edge.is_loop || remaining.contains(edge.target.as_str()))
    });
}
