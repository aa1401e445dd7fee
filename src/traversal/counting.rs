//! Single-source BFS that also counts shortest-path multiplicities.
//!
//! This is the primitive behind Brandes' betweenness accumulation: besides
//! distances it records, per node, the number of distinct shortest paths
//! from the source (sigma) and the predecessor set along those paths, plus
//! the finishing order (non-decreasing distance) for the reverse sweep.

use std::collections::VecDeque;

use crate::graph::{Graph, Key, NodeIndex};

#[derive(Debug, Clone)]
pub struct PathCounts {
    /// Nodes in dequeue order; distances along this list never decrease.
    pub order: Vec<NodeIndex>,
    /// BFS distance from the source, `-1` for unreached nodes.
    pub dist: Vec<i64>,
    /// Number of distinct shortest paths from the source.
    pub sigma: Vec<f64>,
    /// Predecessors of each node on shortest paths from the source.
    pub preds: Vec<Vec<NodeIndex>>,
}

/// Runs counting BFS from `source`, following edge direction on directed
/// graphs.
pub fn shortest_path_counts<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    source: NodeIndex,
) -> PathCounts {
    let n = graph.node_count();
    let mut order = Vec::with_capacity(n);
    let mut dist = vec![-1i64; n];
    let mut sigma = vec![0.0f64; n];
    let mut preds: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

    dist[source.0] = 0;
    sigma[source.0] = 1.0;
    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        for &(w, _) in graph.out_edges(v) {
            if dist[w.0] < 0 {
                dist[w.0] = dist[v.0] + 1;
                queue.push_back(w);
            }
            if dist[w.0] == dist[v.0] + 1 {
                sigma[w.0] += sigma[v.0];
                preds[w.0].push(v);
            }
        }
    }

    PathCounts {
        order,
        dist,
        sigma,
        preds,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn diamond_has_two_shortest_paths() {
        // a -> b -> d and a -> c -> d
        let mut g: Graph<&str> = Graph::directed();
        g.add_edge("a", "b");
        g.add_edge("a", "c");
        g.add_edge("b", "d");
        g.add_edge("c", "d");
        let s = g.index_of(&"a").unwrap();
        let d = g.index_of(&"d").unwrap();

        let counts = shortest_path_counts(&g, s);
        assert_eq!(counts.dist[d.0], 2);
        assert_eq!(counts.sigma[d.0], 2.0);
        assert_eq!(counts.preds[d.0].len(), 2);
    }

    #[test]
    fn order_is_nondecreasing_in_distance() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(0, 3);
        g.add_edge(3, 2);
        let counts = shortest_path_counts(&g, NodeIndex(0));
        let dists: Vec<i64> = counts.order.iter().map(|v| counts.dist[v.0]).collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn unreached_nodes_stay_at_minus_one() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge(0, 1);
        g.add_node(2);
        let counts = shortest_path_counts(&g, NodeIndex(0));
        assert_eq!(counts.dist[2], -1);
        assert_eq!(counts.sigma[2], 0.0);
        assert_eq!(counts.order.len(), 2);
    }
}
