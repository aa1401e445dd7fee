//! Betweenness centrality via Brandes' dependency accumulation.

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeIndex, EdgeMap, Graph, Key, NodeIndex, NodeMap};
use crate::traversal::counting::shortest_path_counts;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BetweennessOptions {
    /// Divide by (n-1)(n-2) for directed graphs, (n-1)(n-2)/2 otherwise.
    pub normalized: bool,
    /// When false, a node's accumulated dependency is skipped only if its
    /// predecessor set is empty and it is not the source. This is narrower
    /// than the textbook endpoint-exclusion rule and is kept as-is.
    pub endpoints: bool,
}

/// Brandes' betweenness: for every source, counting BFS followed by a
/// reverse sweep over the finishing stack folding sigma ratios into each
/// predecessor. Undirected totals are halved because each unordered path is
/// discovered from both endpoints.
pub fn betweenness_centrality<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    options: BetweennessOptions,
) -> NodeMap<K, f64> {
    let n = graph.node_count();
    let mut scores = vec![0.0f64; n];

    for s in 0..n {
        let source = NodeIndex(s);
        let counts = shortest_path_counts(graph, source);
        let mut delta = vec![0.0f64; n];
        for &w in counts.order.iter().rev() {
            for &v in &counts.preds[w.0] {
                if counts.sigma[w.0] > 0.0 {
                    delta[v.0] +=
                        (counts.sigma[v.0] / counts.sigma[w.0]) * (1.0 + delta[w.0]);
                }
            }
            if w != source {
                if !options.endpoints && counts.preds[w.0].is_empty() {
                    continue;
                }
                scores[w.0] += delta[w.0];
            }
        }
    }

    rescale(graph, &mut scores, options.normalized);

    let mut out = NodeMap::default();
    for (i, &score) in scores.iter().enumerate() {
        out.insert(graph.key_of(NodeIndex(i)).clone(), score);
    }
    out
}

/// Edge betweenness: the same dependency quantity accumulated onto the
/// traversed (v, w) edge. Undirected edges are keyed with their insertion
/// endpoint order.
pub fn edge_betweenness_centrality<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    normalized: bool,
) -> EdgeMap<K, f64> {
    let n = graph.node_count();
    let mut scores = vec![0.0f64; graph.edge_count()];

    for s in 0..n {
        let source = NodeIndex(s);
        let counts = shortest_path_counts(graph, source);
        let mut delta = vec![0.0f64; n];
        for &w in counts.order.iter().rev() {
            for &v in &counts.preds[w.0] {
                if counts.sigma[w.0] > 0.0 {
                    let c = (counts.sigma[v.0] / counts.sigma[w.0]) * (1.0 + delta[w.0]);
                    if let Some(e) = graph.edge_index_between(v, w) {
                        scores[e.0] += c;
                    }
                    delta[v.0] += c;
                }
            }
        }
    }

    let scale = edge_scale(graph, n, normalized);
    let mut out = EdgeMap::default();
    for (i, &score) in scores.iter().enumerate() {
        let (u, v) = graph.endpoints_of(EdgeIndex(i));
        out.insert(
            (graph.key_of(u).clone(), graph.key_of(v).clone()),
            score * scale,
        );
    }
    out
}

fn rescale<K: Key, V, E>(graph: &Graph<K, V, E>, scores: &mut [f64], normalized: bool) {
    let n = scores.len();
    let mut scale = if graph.is_directed() { 1.0 } else { 0.5 };
    if normalized && n > 2 {
        let pairs = ((n - 1) * (n - 2)) as f64;
        // undirected: halved totals divided by (n-1)(n-2)/2
        scale /= if graph.is_directed() { pairs } else { pairs / 2.0 };
    }
    for s in scores.iter_mut() {
        *s *= scale;
    }
}

fn edge_scale<K: Key, V, E>(graph: &Graph<K, V, E>, n: usize, normalized: bool) -> f64 {
    let mut scale = if graph.is_directed() { 1.0 } else { 0.5 };
    if normalized && n > 1 {
        let pairs = (n * (n - 1)) as f64;
        scale /= if graph.is_directed() { pairs } else { pairs / 2.0 };
    }
    scale
}

#[cfg(test)]
mod test {
    use super::*;

    fn unnormalized() -> BetweennessOptions {
        BetweennessOptions::default()
    }

    #[test]
    fn triangle_has_no_between_traffic() {
        let mut g: Graph<&str> = Graph::undirected();
        g.add_edge("A", "B");
        g.add_edge("B", "C");
        g.add_edge("C", "A");
        let scores = betweenness_centrality(&g, unnormalized());
        for key in ["A", "B", "C"] {
            assert_eq!(scores[&key], 0.0, "node {key}");
        }
    }

    #[test]
    fn path_graph_interior_nodes_carry_the_paths() {
        // 0-1-2-3: each interior node carries the two paths crossing it
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        let scores = betweenness_centrality(&g, unnormalized());
        assert_eq!(scores[&0], 0.0);
        assert_eq!(scores[&1], 2.0);
        assert_eq!(scores[&2], 2.0);
        assert_eq!(scores[&3], 0.0);
    }

    #[test]
    fn star_center_carries_everything() {
        let mut g: Graph<u32> = Graph::undirected();
        for leaf in 1..=4 {
            g.add_edge(0, leaf);
        }
        let scores = betweenness_centrality(&g, unnormalized());
        // 4 leaves give 4*3/2 = 6 unordered pairs through the center
        assert_eq!(scores[&0], 6.0);
        for leaf in 1..=4 {
            assert_eq!(scores[&leaf], 0.0);
        }
    }

    #[test]
    fn normalization_bounds_scores_to_unit_interval() {
        let mut g: Graph<u32> = Graph::undirected();
        for leaf in 1..=4 {
            g.add_edge(0, leaf);
        }
        let scores = betweenness_centrality(
            &g,
            BetweennessOptions {
                normalized: true,
                endpoints: false,
            },
        );
        assert!((scores[&0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn directed_paths_are_counted_once() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        let scores = betweenness_centrality(&g, unnormalized());
        assert_eq!(scores[&1], 1.0);
    }

    #[test]
    fn edge_betweenness_on_a_path() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        let scores = edge_betweenness_centrality(&g, false);
        // middle edge lies on 0-2, 0-3, 1-2, 1-3
        assert_eq!(scores[&(1, 2)], 4.0);
        assert_eq!(scores[&(0, 1)], 3.0);
        assert_eq!(scores[&(2, 3)], 3.0);
    }
}
