//! Node and edge aggregation.
//!
//! Each unordered entity pair gets at most one [`Edge`]; traffic in the two
//! directions lands in separate half-counts on that single record. Edges are
//! located through a canonical pair key, so lookup is constant-time and the
//! first-seen orientation stays the stored `source`/`target`.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::model::{LetterId, LetterRecord};

// ============================================================================
// Layout-facing DTOs
// ============================================================================

/// A graph node handed to the layout collaborator, which mutates the
/// position/velocity fields in place on every simulation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
        }
    }
}

/// Aggregated correspondence between one pair of entities (or one entity
/// with itself — a self-loop).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub is_loop: bool,
    /// Sum of both half-counts.
    pub count: u64,
    /// Letters sent in the stored `source` → `target` direction.
    #[serde(rename = "countAtoB")]
    pub count_a_to_b: u64,
    /// Letters sent against the stored orientation.
    #[serde(rename = "countBtoA")]
    pub count_b_to_a: u64,
    /// True once traffic has been observed in both directions.
    pub bidirectional: bool,
    /// Contributing publication numbers, deduplicated.
    #[serde(rename = "ids")]
    pub letter_ids: Vec<LetterId>,
}

impl Edge {
    fn new_pair(source: &str, target: &str, id: LetterId) -> Self {
        Self {
            source: source.to_owned(),
            target: target.to_owned(),
            is_loop: source == target,
            count: 1,
            count_a_to_b: 1,
            count_b_to_a: 0,
            bidirectional: false,
            letter_ids: vec![id],
        }
    }

    fn new_loop(entity: &str, id: LetterId) -> Self {
        Self {
            source: entity.to_owned(),
            target: entity.to_owned(),
            is_loop: true,
            count: 1,
            count_a_to_b: 1,
            count_b_to_a: 0,
            bidirectional: false,
            letter_ids: vec![id],
        }
    }

    fn push_letter(&mut self, id: LetterId) {
        if !self.letter_ids.contains(&id) {
            self.letter_ids.push(id);
        }
    }
}

// ============================================================================
// Pair canonicalization
// ============================================================================

/// Canonical key for an unordered entity pair. Loops key on the single name
/// and never merge with any two-entity pair; a pair collapsing to one name
/// shares the loop key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PairKey {
    Loop(String),
    Pair(String, String),
}

impl PairKey {
    fn between(a: &str, b: &str) -> Self {
        if a == b {
            PairKey::Loop(a.to_owned())
        } else if a < b {
            PairKey::Pair(a.to_owned(), b.to_owned())
        } else {
            PairKey::Pair(b.to_owned(), a.to_owned())
        }
    }

    fn loop_on(entity: &str) -> Self {
        PairKey::Loop(entity.to_owned())
    }
}

// ============================================================================
// Aggregation
// ============================================================================

#[derive(Default)]
struct EdgeAccumulator {
    nodes: Vec<GraphNode>,
    seen_nodes: HashSet<String>,
    edges: Vec<Edge>,
    by_pair: HashMap<PairKey, usize>,
}

impl EdgeAccumulator {
    fn add_node(&mut self, name: &str) {
        if self.seen_nodes.insert(name.to_owned()) {
            self.nodes.push(GraphNode::new(name));
        }
    }

    fn record_loop(&mut self, entity: &str, id: LetterId) {
        match self.by_pair.entry(PairKey::loop_on(entity)) {
            hashbrown::hash_map::Entry::Occupied(slot) => {
                let edge = &mut self.edges[*slot.get()];
                edge.count_a_to_b += 1;
                edge.count = edge.count_a_to_b + edge.count_b_to_a;
                edge.push_letter(id);
            }
            hashbrown::hash_map::Entry::Vacant(slot) => {
                slot.insert(self.edges.len());
                self.edges.push(Edge::new_loop(entity, id));
            }
        }
    }

    fn record_pair(&mut self, sender: &str, receiver: &str, id: LetterId) {
        match self.by_pair.entry(PairKey::between(sender, receiver)) {
            hashbrown::hash_map::Entry::Occupied(slot) => {
                let edge = &mut self.edges[*slot.get()];
                if edge.source == sender {
                    edge.count_a_to_b += 1;
                } else {
                    edge.count_b_to_a += 1;
                }
                edge.count = edge.count_a_to_b + edge.count_b_to_a;
                edge.bidirectional = edge.count_a_to_b > 0 && edge.count_b_to_a > 0;
                edge.push_letter(id);
            }
            hashbrown::hash_map::Entry::Vacant(slot) => {
                slot.insert(self.edges.len());
                self.edges.push(Edge::new_pair(sender, receiver, id));
            }
        }
    }
}

/// Whether a record's correspondence stays with its senders: no addressee,
/// or a single addressee who is also among the senders.
fn is_self_loop(record: &LetterRecord) -> bool {
    record.receivers.is_empty()
        || (record.receivers.len() == 1
            && record.receivers.first().is_some_and(|r| record.senders.contains(r)))
}

/// Build the node list and deduplicated edge list for a record set.
///
/// Both lists keep insertion order, so two builds over the same records are
/// equal element-for-element. Records with no sender are rejected at
/// ingestion and never reach this function.
pub fn aggregate(records: &[Arc<LetterRecord>]) -> (Vec<GraphNode>, Vec<Edge>) {
    let mut acc = EdgeAccumulator::default();

    for record in records {
        for sender in &record.senders {
            acc.add_node(sender);
        }

        if is_self_loop(record) {
            for sender in &record.senders {
                acc.record_loop(sender, record.id);
            }
        } else {
            for receiver in &record.receivers {
                acc.add_node(receiver);
            }
            for sender in &record.senders {
                for receiver in &record.receivers {
                    acc.record_pair(sender, receiver, record.id);
                }
            }
        }
    }

    (acc.nodes, acc.edges)
}
