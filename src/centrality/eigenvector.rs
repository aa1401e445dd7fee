//! Eigenvector centrality by power iteration on the adjacency structure.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{Graph, Key, NodeIndex, NodeMap};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EigenvectorConfig {
    pub max_iterations: usize,
    /// L2 distance between successive normalized vectors below which the
    /// iteration stops.
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        EigenvectorConfig {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Each node's score is proportional to the sum of its in-neighbors'
/// scores (all neighbors on an undirected graph), weighted when the graph
/// is weighted. Returns the last iterate if the tolerance is not reached
/// within `max_iterations`.
pub fn eigenvector_centrality<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    config: &EigenvectorConfig,
) -> NodeMap<K, f64> {
    let n = graph.node_count();
    let mut out = NodeMap::default();
    if n == 0 {
        return out;
    }

    let use_weights = graph.is_weighted();
    let mut scores = vec![1.0 / (n as f64).sqrt(); n];
    let mut next = vec![0.0f64; n];

    for iteration in 1..=config.max_iterations {
        next.iter_mut().for_each(|x| *x = 0.0);
        for i in 0..n {
            // fold this node's score into its successors
            for &(w, e) in graph.out_edges(NodeIndex(i)) {
                let weight = if use_weights { graph.weight_of(e) } else { 1.0 };
                next[w.0] += scores[i] * weight;
            }
        }

        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm <= f64::EPSILON {
            // no edges feed anything; all scores collapse to zero
            break;
        }
        next.iter_mut().for_each(|x| *x /= norm);

        let shift: f64 = scores
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        std::mem::swap(&mut scores, &mut next);
        if shift < config.tolerance {
            debug!(iteration, shift, "eigenvector centrality converged");
            break;
        }
    }

    for (i, &s) in scores.iter().enumerate() {
        out.insert(graph.key_of(NodeIndex(i)).clone(), s);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn star_center_dominates() {
        let mut g: Graph<u32> = Graph::undirected();
        for leaf in 1..=4 {
            g.add_edge(0, leaf);
        }
        let scores = eigenvector_centrality(&g, &EigenvectorConfig::default());
        for leaf in 1..=4u32 {
            assert!(scores[&0] > scores[&leaf]);
        }
    }

    #[test]
    fn cycle_is_uniform() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 0);
        let scores = eigenvector_centrality(&g, &EigenvectorConfig::default());
        assert!((scores[&0] - scores[&1]).abs() < 1e-9);
        assert!((scores[&1] - scores[&2]).abs() < 1e-9);
    }

    #[test]
    fn empty_graph_yields_empty_map() {
        let g: Graph<u32> = Graph::undirected();
        assert!(eigenvector_centrality(&g, &EigenvectorConfig::default()).is_empty());
    }
}
