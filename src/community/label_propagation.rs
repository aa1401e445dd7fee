//! Label propagation: nodes adopt the most frequent label among their
//! neighbors until nothing changes.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{Graph, Key, NodeIndex, NodeMap};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelPropagationResult<K: Key> {
    /// Node to label, renumbered contiguously from 0 in node order.
    pub labels: NodeMap<K, usize>,
    pub community_count: usize,
    pub iterations: usize,
}

/// Synchronous-by-sweep propagation; ties between equally frequent labels go
/// to the smallest label so runs are reproducible. Edge direction is
/// ignored.
pub fn label_propagation<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    max_iterations: usize,
) -> LabelPropagationResult<K> {
    let n = graph.node_count();
    let mut labels: Vec<usize> = (0..n).collect();
    let mut iterations = 0;

    for pass in 1..=max_iterations {
        iterations = pass;
        let mut changed = false;
        for i in 0..n {
            let mut counts: AHashMap<usize, usize> = AHashMap::new();
            for (j, _) in graph.undirected_edges(NodeIndex(i)) {
                if j.0 != i {
                    *counts.entry(labels[j.0]).or_default() += 1;
                }
            }
            let winner = counts
                .iter()
                .map(|(&label, &count)| (count, std::cmp::Reverse(label)))
                .max()
                .map(|(_, std::cmp::Reverse(label))| label);
            if let Some(best) = winner {
                if labels[i] != best {
                    labels[i] = best;
                    changed = true;
                }
            }
        }
        debug!(pass, changed, "label propagation pass finished");
        if !changed {
            break;
        }
    }

    let mut remap: AHashMap<usize, usize> = AHashMap::new();
    let mut out = NodeMap::default();
    for (i, &label) in labels.iter().enumerate() {
        let next = remap.len();
        let id = *remap.entry(label).or_insert(next);
        out.insert(graph.key_of(NodeIndex(i)).clone(), id);
    }
    LabelPropagationResult {
        community_count: remap.len(),
        labels: out,
        iterations,
    }
}
