//! Katz centrality: eigenvector centrality with attenuated long-range
//! contributions and a constant base score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Key, NodeIndex, NodeMap};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct KatzConfig {
    /// Attenuation factor; must lie in (0, 1) and below the reciprocal of
    /// the adjacency spectral radius for the series to converge.
    pub alpha: f64,
    pub max_iterations: usize,
    /// L1 distance between successive score vectors below which the
    /// iteration stops.
    pub tolerance: f64,
}

impl Default for KatzConfig {
    fn default() -> Self {
        KatzConfig {
            alpha: 0.1,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Iterates x = 1 + alpha * A^T x: each node scores a constant plus the
/// attenuated scores of the nodes pointing at it (all neighbors on an
/// undirected graph).
pub fn katz_centrality<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    config: &KatzConfig,
) -> Result<NodeMap<K, f64>> {
    if config.alpha <= 0.0 || config.alpha >= 1.0 {
        return Err(GraphError::InvalidParameter {
            name: "alpha",
            reason: format!("must be in (0, 1), got {}", config.alpha),
        });
    }
    let n = graph.node_count();
    let use_weights = graph.is_weighted();
    let mut scores = vec![1.0f64; n];
    let mut next = vec![0.0f64; n];

    for iteration in 1..=config.max_iterations {
        for i in 0..n {
            let incoming: f64 = graph
                .in_edges(NodeIndex(i))
                .iter()
                .map(|&(w, e)| {
                    let weight = if use_weights { graph.weight_of(e) } else { 1.0 };
                    scores[w.0] * weight
                })
                .sum();
            next[i] = 1.0 + config.alpha * incoming;
        }
        let diff: f64 = scores
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        std::mem::swap(&mut scores, &mut next);
        if diff < config.tolerance {
            debug!(iteration, diff, "katz centrality converged");
            break;
        }
    }

    let mut out = NodeMap::default();
    for (i, &s) in scores.iter().enumerate() {
        out.insert(graph.key_of(NodeIndex(i)).clone(), s);
    }
    Ok(out)
}
