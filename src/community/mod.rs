//! Community detection and partition quality.

use ahash::AHashMap;

use crate::graph::{EdgeIndex, Graph, Key, NodeIndex, NodeMap};

pub mod girvan_newman;
pub mod label_propagation;
pub mod louvain;

pub use girvan_newman::girvan_newman;
pub use label_propagation::{label_propagation, LabelPropagationResult};
pub use louvain::{louvain, LouvainConfig, LouvainResult};

/// Modularity of a node-to-community assignment:
/// Q = (1/2m) * sum over same-community ordered pairs of
/// [A_ij - resolution * k_i * k_j / 2m], computed through per-community
/// aggregates. Nodes absent from the assignment count as singleton
/// communities of their own. Returns 0 for a graph without edge weight.
pub fn modularity<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    assignment: &NodeMap<K, usize>,
    resolution: f64,
) -> f64 {
    let n = graph.node_count();
    // caller ids may be arbitrary; remap them onto 0..c
    let mut remap: AHashMap<usize, usize> = AHashMap::new();
    let mut dense = vec![0usize; n];
    for i in 0..n {
        match assignment.get(graph.key_of(NodeIndex(i))) {
            Some(&c) => {
                let next = remap.len();
                dense[i] = *remap.entry(c).or_insert(next);
            }
            None => {
                dense[i] = remap.len() + n + i;
            }
        }
    }
    let degrees = weighted_degrees(graph);
    modularity_dense(graph, &dense, &degrees, resolution)
}

/// Weighted degree per node; direction is ignored, so a directed edge
/// contributes to both endpoints just as an undirected one does.
pub(crate) fn weighted_degrees<K: Key, V, E>(graph: &Graph<K, V, E>) -> Vec<f64> {
    (0..graph.node_count())
        .map(|i| {
            graph
                .undirected_edges(NodeIndex(i))
                .map(|(_, e)| graph.weight_of(e))
                .sum()
        })
        .collect()
}

pub(crate) fn modularity_dense<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    community: &[usize],
    degrees: &[f64],
    resolution: f64,
) -> f64 {
    let two_m: f64 = degrees.iter().sum();
    if two_m <= 0.0 {
        return 0.0;
    }

    let communities = community.iter().copied().max().map_or(0, |m| m + 1);
    let mut internal = vec![0.0f64; communities];
    let mut total = vec![0.0f64; communities];
    for (i, &c) in community.iter().enumerate() {
        total[c] += degrees[i];
    }
    for edge in 0..graph.edge_count() {
        let (u, v) = graph.endpoints_of(EdgeIndex(edge));
        if community[u.0] == community[v.0] {
            let w = graph.weight_of(EdgeIndex(edge));
            // ordered pairs: each edge counts from both ends
            internal[community[u.0]] += if u == v { w } else { 2.0 * w };
        }
    }

    let mut q = 0.0;
    for c in 0..communities {
        q += internal[c] - resolution * total[c] * total[c] / two_m;
    }
    q / two_m
}
