//! Degree centrality.

use serde::{Deserialize, Serialize};

use crate::graph::{Direction, Graph, Key, NodeIndex, NodeMap};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DegreeOptions {
    /// Which incident edges to count on a directed graph; ignored for
    /// undirected graphs.
    pub direction: Direction,
    /// Divide every score by |V|-1.
    pub normalized: bool,
}

/// Degree of every node, optionally restricted by direction and normalized
/// by the maximum possible degree.
pub fn degree_centrality<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    options: DegreeOptions,
) -> NodeMap<K, f64> {
    let n = graph.node_count();
    let denom = if options.normalized && n > 1 {
        (n - 1) as f64
    } else {
        1.0
    };

    let mut out = NodeMap::default();
    for i in 0..n {
        let idx = NodeIndex(i);
        let deg = graph.degree_of(idx, options.direction) as f64;
        out.insert(graph.key_of(idx).clone(), deg / denom);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn triangle_degrees_are_all_two() {
        let mut g: Graph<&str> = Graph::undirected();
        g.add_edge("A", "B");
        g.add_edge("B", "C");
        g.add_edge("C", "A");
        let scores = degree_centrality(&g, DegreeOptions::default());
        assert_eq!(scores[&"A"], 2.0);
        assert_eq!(scores[&"B"], 2.0);
        assert_eq!(scores[&"C"], 2.0);
    }

    #[test]
    fn degree_sum_is_twice_the_edge_count() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 0);
        g.add_edge(0, 2);
        let total: f64 = degree_centrality(&g, DegreeOptions::default())
            .values()
            .sum();
        assert_eq!(total, 2.0 * g.edge_count() as f64);
    }

    #[test]
    fn directed_direction_options() {
        let mut g: Graph<&str> = Graph::directed();
        g.add_edge("a", "b");
        g.add_edge("c", "b");
        let by = |direction| {
            degree_centrality(
                &g,
                DegreeOptions {
                    direction,
                    normalized: false,
                },
            )
        };
        assert_eq!(by(Direction::In)[&"b"], 2.0);
        assert_eq!(by(Direction::Out)[&"b"], 0.0);
        assert_eq!(by(Direction::Total)[&"b"], 2.0);
    }

    #[test]
    fn normalization_divides_by_n_minus_one() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(0, 2);
        g.add_edge(0, 3);
        let scores = degree_centrality(
            &g,
            DegreeOptions {
                direction: Direction::Total,
                normalized: true,
            },
        );
        assert_eq!(scores[&0], 1.0);
        assert!((scores[&1] - 1.0 / 3.0).abs() < 1e-12);
    }
}
