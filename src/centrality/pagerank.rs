//! PageRank by power iteration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Key, NodeIndex, NodeMap};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PageRankConfig {
    pub damping: f64,
    pub max_iterations: usize,
    /// L1 distance between successive rank vectors below which the
    /// iteration stops.
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        PageRankConfig {
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Rank mass flows along out-edges, split by edge weight when the graph is
/// weighted and evenly otherwise; dangling nodes spread their mass over the
/// whole graph. Scores sum to 1.
pub fn pagerank<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    config: &PageRankConfig,
) -> Result<NodeMap<K, f64>> {
    if !(0.0..1.0).contains(&config.damping) {
        return Err(GraphError::InvalidParameter {
            name: "damping",
            reason: format!("must be in [0, 1), got {}", config.damping),
        });
    }
    let n = graph.node_count();
    if n == 0 {
        return Ok(NodeMap::default());
    }

    // out-strength per node: weighted out-degree, or plain out-degree
    let use_weights = graph.is_weighted();
    let strength: Vec<f64> = (0..n)
        .map(|i| {
            graph
                .out_edges(NodeIndex(i))
                .iter()
                .map(|&(_, e)| if use_weights { graph.weight_of(e) } else { 1.0 })
                .sum()
        })
        .collect();

    let uniform = 1.0 / n as f64;
    let mut ranks = vec![uniform; n];
    let mut next = vec![0.0f64; n];

    for iteration in 1..=config.max_iterations {
        let mut dangling_mass = 0.0;
        for (i, &r) in ranks.iter().enumerate() {
            if strength[i] <= 0.0 {
                dangling_mass += r;
            }
        }

        let base = (1.0 - config.damping) * uniform
            + config.damping * dangling_mass * uniform;
        next.iter_mut().for_each(|x| *x = base);
        for i in 0..n {
            if strength[i] <= 0.0 {
                continue;
            }
            let share = config.damping * ranks[i] / strength[i];
            for &(w, e) in graph.out_edges(NodeIndex(i)) {
                let portion = if use_weights { graph.weight_of(e) } else { 1.0 };
                next[w.0] += share * portion;
            }
        }

        let delta: f64 = ranks
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        std::mem::swap(&mut ranks, &mut next);
        if delta < config.tolerance {
            debug!(iteration, delta, "pagerank converged");
            break;
        }
    }

    let mut out = NodeMap::default();
    for (i, &r) in ranks.iter().enumerate() {
        out.insert(graph.key_of(NodeIndex(i)).clone(), r);
    }
    Ok(out)
}
