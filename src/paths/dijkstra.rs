//! Dijkstra's algorithm for non-negative edge weights.

use bitvec::vec::BitVec;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Key, NodeIndex, NodeMap};
use crate::queue::MinQueue;

use super::PathResult;

/// Shortest distances from `source` to every reachable node. Unreached
/// nodes are absent from the result rather than reported as infinite.
///
/// Fails with [`GraphError::UnsupportedWeight`] the moment a negative edge
/// weight is encountered during relaxation.
pub fn dijkstra<K: Key, V, E>(graph: &Graph<K, V, E>, source: &K) -> Result<NodeMap<K, f64>> {
    let s = graph.require(source)?;
    let dist = run(graph, s, None, None)?;

    let mut out = NodeMap::default();
    for (i, &d) in dist.iter().enumerate() {
        if d.is_finite() {
            out.insert(graph.key_of(NodeIndex(i)).clone(), d);
        }
    }
    Ok(out)
}

/// Shortest path from `source` to `target`, terminating the search as soon
/// as the target is finalized. Returns `Ok(None)` when the target is
/// unreachable; `source == target` short-circuits to a zero-length path.
pub fn dijkstra_path<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    source: &K,
    target: &K,
) -> Result<Option<PathResult<K>>> {
    let s = graph.require(source)?;
    let t = graph.require(target)?;
    if s == t {
        return Ok(Some(PathResult {
            distance: 0.0,
            path: vec![source.clone()],
        }));
    }

    let mut prev: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
    let dist = run(graph, s, Some(t), Some(&mut prev))?;
    if !dist[t.0].is_finite() {
        return Ok(None);
    }

    let mut path = Vec::new();
    let mut cursor = Some(t);
    while let Some(v) = cursor {
        path.push(graph.key_of(v).clone());
        cursor = prev[v.0];
    }
    path.reverse();
    Ok(Some(PathResult {
        distance: dist[t.0],
        path,
    }))
}

/// Core loop shared by the distance-map and path entry points. Stale queue
/// entries for already-finalized nodes are skipped on dequeue rather than
/// removed in place.
fn run<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    source: NodeIndex,
    target: Option<NodeIndex>,
    mut prev: Option<&mut Vec<Option<NodeIndex>>>,
) -> Result<Vec<f64>> {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut finalized: BitVec = BitVec::repeat(false, n);
    let mut queue = MinQueue::new();

    dist[source.0] = 0.0;
    queue.push(source, 0.0);
    while let Some((v, _)) = queue.pop() {
        if finalized[v.0] {
            continue;
        }
        finalized.set(v.0, true);
        if target == Some(v) {
            break;
        }
        for &(w, e) in graph.out_edges(v) {
            let weight = graph.weight_of(e);
            if weight < 0.0 {
                return Err(GraphError::UnsupportedWeight {
                    from_node: format!("{:?}", graph.key_of(v)),
                    target: format!("{:?}", graph.key_of(w)),
                    weight,
                });
            }
            let candidate = dist[v.0] + weight;
            if candidate < dist[w.0] {
                dist[w.0] = candidate;
                if let Some(prev) = prev.as_deref_mut() {
                    prev[w.0] = Some(v);
                }
                queue.push(w, candidate);
            }
        }
    }
    Ok(dist)
}

#[cfg(test)]
mod test {
    use super::*;

    fn weighted_square() -> Graph<u32> {
        // 0 -1- 1 -2- 2 -3- 3, plus a 10-weight shortcut 0-3
        let mut g = Graph::undirected();
        g.add_edge_weighted(0, 1, 1.0);
        g.add_edge_weighted(1, 2, 2.0);
        g.add_edge_weighted(2, 3, 3.0);
        g.add_edge_weighted(0, 3, 10.0);
        g
    }

    #[test]
    fn distances_prefer_the_cheaper_route() {
        let g = weighted_square();
        let dist = dijkstra(&g, &0).unwrap();
        assert_eq!(dist[&0], 0.0);
        assert_eq!(dist[&1], 1.0);
        assert_eq!(dist[&2], 3.0);
        assert_eq!(dist[&3], 6.0);
    }

    #[test]
    fn path_follows_the_distances() {
        let g = weighted_square();
        let result = dijkstra_path(&g, &0, &3).unwrap().unwrap();
        assert_eq!(result.distance, 6.0);
        assert_eq!(result.path, vec![0, 1, 2, 3]);
    }

    #[test]
    fn source_equals_target() {
        let g = weighted_square();
        let result = dijkstra_path(&g, &2, &2).unwrap().unwrap();
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.path, vec![2]);
    }

    #[test]
    fn unreachable_target_is_none_and_absent() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge(0, 1);
        g.add_node(2);
        assert!(dijkstra_path(&g, &0, &2).unwrap().is_none());
        let dist = dijkstra(&g, &0).unwrap();
        assert!(!dist.contains_key(&2));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge_weighted(0, 1, -2.0);
        assert!(matches!(
            dijkstra(&g, &0),
            Err(GraphError::UnsupportedWeight { .. })
        ));
    }

    #[test]
    fn direction_is_respected() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge_weighted(0, 1, 1.0);
        let dist = dijkstra(&g, &1).unwrap();
        assert!(!dist.contains_key(&0));
    }
}
