//! Louvain modularity optimization (single-level local moving).

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{Graph, Key, NodeIndex, NodeMap};

use super::{modularity_dense, weighted_degrees};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LouvainConfig {
    /// Gamma in the modularity null model; larger values favor smaller
    /// communities.
    pub resolution: f64,
    /// Relative modularity improvement per pass below which the search
    /// stops.
    pub tolerance: f64,
    /// Cap on full passes over the node set.
    pub max_iterations: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        LouvainConfig {
            resolution: 1.0,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LouvainResult<K: Key> {
    /// Node to community id, renumbered contiguously from 0 in node order.
    pub communities: NodeMap<K, usize>,
    pub modularity: f64,
    /// Full passes performed.
    pub iterations: usize,
}

/// Local moving only: every pass offers each node its neighboring
/// communities (and staying put) and takes the best modularity gain. There
/// is no aggregation into super-nodes between passes; the method stops at
/// the first level.
pub fn louvain<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    config: &LouvainConfig,
) -> LouvainResult<K> {
    let n = graph.node_count();
    let degrees = weighted_degrees(graph);
    let two_m: f64 = degrees.iter().sum();

    let mut community: Vec<usize> = (0..n).collect();
    if two_m <= 0.0 {
        return finish(graph, community, 0.0, 0);
    }

    // per-community degree sums, kept in step with every move
    let mut sigma_tot = degrees.clone();
    let mut prev_q = modularity_dense(graph, &community, &degrees, config.resolution);
    let mut q = prev_q;
    let mut iterations = 0;

    for pass in 1..=config.max_iterations {
        iterations = pass;
        let mut moves = 0usize;

        for i in 0..n {
            let current = community[i];

            // weight towards each neighboring community, self-loops skipped
            let mut weights: AHashMap<usize, f64> = AHashMap::new();
            for (j, e) in graph.undirected_edges(NodeIndex(i)) {
                if j.0 != i {
                    *weights.entry(community[j.0]).or_default() += graph.weight_of(e);
                }
            }

            // take the node out before weighing the alternatives
            sigma_tot[current] -= degrees[i];

            let gain = |c: usize| {
                weights.get(&c).copied().unwrap_or(0.0)
                    - config.resolution * degrees[i] * sigma_tot[c] / two_m
            };
            let mut best = current;
            let mut best_gain = gain(current);
            let mut candidates: Vec<usize> = weights.keys().copied().collect();
            candidates.sort_unstable();
            for c in candidates {
                let g = gain(c);
                if g > best_gain {
                    best_gain = g;
                    best = c;
                }
            }

            sigma_tot[best] += degrees[i];
            if best != current {
                community[i] = best;
                moves += 1;
            }
        }

        q = modularity_dense(graph, &community, &degrees, config.resolution);
        debug!(pass, moves, modularity = q, "louvain pass finished");
        if moves == 0 {
            break;
        }
        if q - prev_q < config.tolerance {
            break;
        }
        prev_q = q;
    }

    finish(graph, community, q, iterations)
}

fn finish<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    community: Vec<usize>,
    modularity: f64,
    iterations: usize,
) -> LouvainResult<K> {
    // renumber to contiguous ids in node order
    let mut remap: AHashMap<usize, usize> = AHashMap::new();
    let mut communities = NodeMap::default();
    for (i, &c) in community.iter().enumerate() {
        let next = remap.len();
        let id = *remap.entry(c).or_insert(next);
        communities.insert(graph.key_of(NodeIndex(i)).clone(), id);
    }
    LouvainResult {
        communities,
        modularity,
        iterations,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::community::modularity;

    fn two_cliques_with_bridge() -> Graph<u32> {
        let mut g = Graph::undirected();
        for a in 0..3u32 {
            for b in (a + 1)..3 {
                g.add_edge(a, b);
            }
        }
        for a in 3..6u32 {
            for b in (a + 1)..6 {
                g.add_edge(a, b);
            }
        }
        g.add_edge_weighted(2, 3, 0.1);
        g
    }

    #[test]
    fn separates_the_cliques() {
        let g = two_cliques_with_bridge();
        let result = louvain(&g, &LouvainConfig::default());
        let c = &result.communities;
        assert_eq!(c[&0], c[&1]);
        assert_eq!(c[&1], c[&2]);
        assert_eq!(c[&3], c[&4]);
        assert_eq!(c[&4], c[&5]);
        assert_ne!(c[&0], c[&3]);
    }

    #[test]
    fn final_modularity_beats_singletons() {
        let g = two_cliques_with_bridge();
        let result = louvain(&g, &LouvainConfig::default());
        let mut singletons = NodeMap::default();
        for (i, key) in g.nodes().enumerate() {
            singletons.insert(*key, i);
        }
        assert!(result.modularity >= modularity(&g, &singletons, 1.0));
    }

    #[test]
    fn reported_modularity_matches_the_partition() {
        let g = two_cliques_with_bridge();
        let result = louvain(&g, &LouvainConfig::default());
        let recomputed = modularity(&g, &result.communities, 1.0);
        assert!((result.modularity - recomputed).abs() < 1e-12);
    }

    #[test]
    fn community_ids_are_contiguous() {
        let g = two_cliques_with_bridge();
        let result = louvain(&g, &LouvainConfig::default());
        let max = result.communities.values().copied().max().unwrap();
        let distinct: std::collections::BTreeSet<usize> =
            result.communities.values().copied().collect();
        assert_eq!(distinct.len(), max + 1);
    }

    #[test]
    fn empty_and_edgeless_graphs() {
        let g: Graph<u32> = Graph::undirected();
        let result = louvain(&g, &LouvainConfig::default());
        assert!(result.communities.is_empty());
        assert_eq!(result.iterations, 0);

        let mut lonely: Graph<u32> = Graph::undirected();
        lonely.add_node(1);
        lonely.add_node(2);
        let result = louvain(&lonely, &LouvainConfig::default());
        assert_eq!(result.modularity, 0.0);
        assert_eq!(result.communities.len(), 2);
    }

    #[test]
    fn iteration_count_is_bounded_by_config() {
        let g = two_cliques_with_bridge();
        let config = LouvainConfig {
            max_iterations: 1,
            ..Default::default()
        };
        let result = louvain(&g, &config);
        assert_eq!(result.iterations, 1);
    }
}
