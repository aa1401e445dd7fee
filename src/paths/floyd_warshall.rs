//! Floyd-Warshall all-pairs shortest distances.

use crate::graph::{EdgeIndex, Graph, Key, NodeIndex, NodeMap};

/// All-pairs shortest distances as a nested mapping; unreachable pairs are
/// absent. Negative edge weights are allowed; in the presence of a negative
/// cycle the distances touching it are not meaningful (use
/// [`crate::paths::has_negative_cycle`] to check first).
pub fn floyd_warshall<K: Key, V, E>(graph: &Graph<K, V, E>) -> NodeMap<K, NodeMap<K, f64>> {
    let n = graph.node_count();
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for edge in 0..graph.edge_count() {
        let e = EdgeIndex(edge);
        let (u, v) = graph.endpoints_of(e);
        let w = graph.weight_of(e);
        // parallel routes collapse to the cheaper one
        if w < dist[u.0][v.0] {
            dist[u.0][v.0] = w;
        }
        if !graph.is_directed() && w < dist[v.0][u.0] {
            dist[v.0][u.0] = w;
        }
    }

    for k in 0..n {
        for i in 0..n {
            if !dist[i][k].is_finite() {
                continue;
            }
            for j in 0..n {
                let through = dist[i][k] + dist[k][j];
                if through < dist[i][j] {
                    dist[i][j] = through;
                }
            }
        }
    }

    let mut out = NodeMap::default();
    for i in 0..n {
        let mut row = NodeMap::default();
        for j in 0..n {
            if dist[i][j].is_finite() {
                row.insert(graph.key_of(NodeIndex(j)).clone(), dist[i][j]);
            }
        }
        out.insert(graph.key_of(NodeIndex(i)).clone(), row);
    }
    out
}
