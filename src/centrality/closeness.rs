//! Closeness centrality over unweighted hop distances.

use std::collections::VecDeque;

use crate::graph::{Graph, Key, NodeIndex, NodeMap};

/// For each node, the number of reachable nodes divided by the sum of their
/// hop distances; 0 when nothing is reachable. Disconnected graphs are fine:
/// only reached nodes enter the ratio.
pub fn closeness_centrality<K: Key, V, E>(graph: &Graph<K, V, E>) -> NodeMap<K, f64> {
    let n = graph.node_count();
    let mut out = NodeMap::default();

    let mut dist = vec![-1i64; n];
    for s in 0..n {
        dist.iter_mut().for_each(|d| *d = -1);
        dist[s] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(NodeIndex(s));
        let mut total = 0i64;
        let mut reachable = 0usize;

        while let Some(v) = queue.pop_front() {
            for &(w, _) in graph.out_edges(v) {
                if dist[w.0] < 0 {
                    dist[w.0] = dist[v.0] + 1;
                    total += dist[w.0];
                    reachable += 1;
                    queue.push_back(w);
                }
            }
        }

        let score = if reachable > 0 && total > 0 {
            reachable as f64 / total as f64
        } else {
            0.0
        };
        out.insert(graph.key_of(NodeIndex(s)).clone(), score);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn path_center_is_closest() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 4);
        let scores = closeness_centrality(&g);
        assert!(scores[&2] > scores[&1]);
        assert!(scores[&1] > scores[&0]);
        assert_eq!(scores[&0], scores[&4]);
    }

    #[test]
    fn isolated_node_scores_zero() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_node(2);
        let scores = closeness_centrality(&g);
        assert_eq!(scores[&2], 0.0);
    }

    #[test]
    fn directed_reachability_only_counts_forward() {
        let mut g: Graph<&str> = Graph::directed();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        let scores = closeness_centrality(&g);
        assert!(scores[&"a"] > 0.0);
        assert_eq!(scores[&"c"], 0.0);
    }
}
