//! Per-entity letter counters and letter index.
//!
//! The accumulation rule weights the receiver side by sender count: a letter
//! with `k` senders adds `k` to every receiver's `degree`/`in_count`, so a
//! collectively-written letter pulls on its addressee proportionally to its
//! fan-in. Letters with no receiver count against the sender's `self_count`
//! only — they never touch `in_count`.

use std::collections::BTreeMap;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::model::{LetterId, LetterRecord};

/// Counters and letter index for one entity. Created lazily on first
/// reference, rebuilt from scratch on every [`compute`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMetrics {
    /// Total letters touching this entity (sent + received + no-addressee),
    /// receiver side weighted by sender count.
    pub degree: u64,
    /// Letters this entity sent.
    pub out_count: u64,
    /// Letters this entity received, weighted by sender count.
    pub in_count: u64,
    /// Letters this entity sent with no addressee.
    pub self_count: u64,
    /// Every letter referencing this entity, sorted by publication number.
    pub letters: BTreeMap<LetterId, Arc<LetterRecord>>,
}

impl EntityMetrics {
    fn record_letter(&mut self, record: &Arc<LetterRecord>) {
        self.letters.entry(record.id).or_insert_with(|| Arc::clone(record));
    }

    /// Publication numbers referencing this entity, ascending.
    pub fn letter_ids(&self) -> impl Iterator<Item = LetterId> + '_ {
        self.letters.keys().copied()
    }
}

/// Entity name → [`EntityMetrics`], for one build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsIndex {
    entities: HashMap<String, EntityMetrics>,
}

impl MetricsIndex {
    pub fn get(&self, name: &str) -> Option<&EntityMetrics> {
        self.entities.get(name)
    }

    /// Degree of an entity; entities never seen have degree 0.
    pub fn degree_of(&self, name: &str) -> u64 {
        self.entities.get(name).map_or(0, |m| m.degree)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityMetrics)> {
        self.entities.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn entity_mut(&mut self, name: &str) -> &mut EntityMetrics {
        self.entities.entry_ref(name).or_default()
    }
}

/// Compute per-entity metrics for a record set. Pure: a fresh index per call.
pub fn compute(records: &[Arc<LetterRecord>]) -> MetricsIndex {
    let mut index = MetricsIndex::default();

    for record in records {
        let sender_count = record.senders.len() as u64;

        for sender in &record.senders {
            let entry = index.entity_mut(sender);
            entry.record_letter(record);
            entry.out_count += 1;
            entry.degree += 1;
        }

        if record.receivers.is_empty() {
            for sender in &record.senders {
                index.entity_mut(sender).self_count += 1;
            }
        } else {
            for receiver in &record.receivers {
                let entry = index.entity_mut(receiver);
                entry.record_letter(record);
                entry.in_count += sender_count;
                entry.degree += sender_count;
            }
        }
    }

    index
}
