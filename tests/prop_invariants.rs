//! Property tests for the accumulation invariants.
//!
//! For every record with k senders and m ≥ 1 receivers, the receiver side
//! gains k·m degree and the sender side gains k; with no receiver the
//! record contributes k degree and k self-counts. Aggregate counts must
//! respect those sums for arbitrary record sets.

use std::sync::Arc;

use proptest::prelude::*;

use epistograph::graph;
use epistograph::model::LetterRecord;

const NAMES: &[&str] = &["Анна", "Борис", "Вера", "Глеб", "Дарья"];

type RecordSpec = (Vec<String>, Vec<String>);

fn name() -> impl Strategy<Value = String> {
    (0..NAMES.len()).prop_map(|i| NAMES[i].to_owned())
}

fn record_specs() -> impl Strategy<Value = Vec<RecordSpec>> {
    prop::collection::vec(
        (
            prop::collection::vec(name(), 1..=3),
            prop::collection::vec(name(), 0..=3),
        ),
        0..25,
    )
}

fn materialize(specs: &[RecordSpec]) -> Vec<Arc<LetterRecord>> {
    specs
        .iter()
        .enumerate()
        .map(|(idx, (senders, receivers))| {
            Arc::new(
                LetterRecord::new(idx as u64 + 1, senders.clone())
                    .with_receivers(receivers.clone()),
            )
        })
        .collect()
}

fn is_loop_spec(senders: &[String], receivers: &[String]) -> bool {
    receivers.is_empty() || (receivers.len() == 1 && senders.contains(&receivers[0]))
}

proptest! {
    #[test]
    fn prop_degree_accounting(specs in record_specs()) {
        let records = materialize(&specs);
        let index = graph::metrics::compute(&records);

        let mut expected_out = 0u64;
        let mut expected_in = 0u64;
        let mut expected_self = 0u64;
        for (senders, receivers) in &specs {
            let k = senders.len() as u64;
            let m = receivers.len() as u64;
            expected_out += k;
            if m == 0 {
                expected_self += k;
            } else {
                expected_in += k * m;
            }
        }

        let total_out: u64 = index.iter().map(|(_, m)| m.out_count).sum();
        let total_in: u64 = index.iter().map(|(_, m)| m.in_count).sum();
        let total_self: u64 = index.iter().map(|(_, m)| m.self_count).sum();
        let total_degree: u64 = index.iter().map(|(_, m)| m.degree).sum();

        prop_assert_eq!(total_out, expected_out);
        prop_assert_eq!(total_in, expected_in);
        prop_assert_eq!(total_self, expected_self);
        prop_assert_eq!(total_degree, expected_out + expected_in);
    }

    #[test]
    fn prop_edge_counts_sum_to_record_contributions(specs in record_specs()) {
        let records = materialize(&specs);
        let (_, edges) = graph::edges::aggregate(&records);

        let expected: u64 = specs
            .iter()
            .map(|(senders, receivers)| {
                let k = senders.len() as u64;
                if is_loop_spec(senders, receivers) {
                    k
                } else {
                    k * receivers.len() as u64
                }
            })
            .sum();

        let total: u64 = edges.iter().map(|e| e.count).sum();
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn prop_at_most_one_edge_per_unordered_pair(specs in record_specs()) {
        let records = materialize(&specs);
        let (_, edges) = graph::edges::aggregate(&records);

        let mut seen = std::collections::HashSet::new();
        for edge in &edges {
            let key = if edge.is_loop {
                (edge.source.clone(), None)
            } else {
                let (a, b) = if edge.source < edge.target {
                    (edge.source.clone(), edge.target.clone())
                } else {
                    (edge.target.clone(), edge.source.clone())
                };
                (a, Some(b))
            };
            prop_assert!(seen.insert(key), "duplicate edge for a pair");
        }

        for edge in &edges {
            prop_assert_eq!(edge.count, edge.count_a_to_b + edge.count_b_to_a);
            prop_assert_eq!(
                edge.bidirectional,
                edge.count_a_to_b > 0 && edge.count_b_to_a > 0
            );
        }
    }

    #[test]
    fn prop_rebuild_is_idempotent(specs in record_specs()) {
        let records = materialize(&specs);
        prop_assert_eq!(graph::build(&records), graph::build(&records));
    }

    #[test]
    fn prop_degree_filter_keeps_only_qualifying_nodes(
        specs in record_specs(),
        min_degree in 0u64..6,
    ) {
        let records = materialize(&specs);
        let full = graph::build(&records);
        let mut filtered = graph::build(&records);
        graph::filter::apply_min_degree(&mut filtered, min_degree);

        for node in &filtered.nodes {
            prop_assert!(filtered.metrics.degree_of(&node.id) >= min_degree);
        }

        let full_ids: std::collections::HashSet<&str> =
            full.nodes.iter().map(|n| n.id.as_str()).collect();
        for node in &filtered.nodes {
            prop_assert!(full_ids.contains(node.id.as_str()));
        }

        for edge in &filtered.edges {
            let has_source = filtered.nodes.iter().any(|n| n.id == edge.source);
            prop_assert!(has_source);
            if !edge.is_loop {
                let has_target = filtered.nodes.iter().any(|n| n.id == edge.target);
                prop_assert!(has_target);
            }
        }
    }
}
