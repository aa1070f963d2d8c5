//! # Graph Construction
//!
//! The rebuild pipeline: records → metrics → aggregation → degree filter.
//! Every call produces a fresh [`Network`]; nothing is shared or mutated
//! across rebuilds.

pub mod edges;
pub mod filter;
pub mod metrics;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::model::LetterRecord;

pub use edges::{Edge, GraphNode};
pub use filter::FilterParams;
pub use metrics::{EntityMetrics, MetricsIndex};

/// One built correspondence network. Ephemeral: owned by the caller,
/// replaced wholesale on the next filter change.
///
/// Serializes to the `{nodes, edges}` shape the layout collaborator
/// consumes; the metrics index stays on the Rust side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Network {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
    #[serde(skip)]
    pub metrics: MetricsIndex,
}

impl Network {
    /// The "no data" terminal state — valid, not an error. The caller
    /// renders a placeholder instead of a simulation.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Build the full network for a record set, no filtering.
pub fn build(records: &[Arc<LetterRecord>]) -> Network {
    // Phase 1: per-entity counters and letter index
    let metrics = metrics::compute(records);

    // Phase 2: node set + deduplicated edge list
    let (nodes, edges) = edges::aggregate(records);

    debug!(
        records = records.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "network built"
    );

    Network { nodes, edges, metrics }
}

/// Build with the year selection and degree threshold applied.
pub fn build_filtered(records: &[Arc<LetterRecord>], params: &FilterParams) -> Network {
    let kept = filter::by_years(records, &params.years);
    let mut network = build(&kept);
    filter::apply_min_degree(&mut network, params.min_degree);
    network
}
