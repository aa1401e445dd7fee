//! Bellman-Ford: shortest paths under negative edge weights, with negative
//! cycle detection.

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::{EdgeIndex, Graph, Key, NodeIndex, NodeMap};

use super::PathResult;

/// The outcome of a Bellman-Ford run. Cycle *detection* is an answer, not a
/// failure: distances for nodes unaffected by a cycle remain meaningful and
/// the affected relaxation endpoints are listed.
#[derive(Debug, Clone)]
pub struct BellmanFordOutcome<K> {
    pub distances: NodeMap<K, f64>,
    pub has_negative_cycle: bool,
    /// Endpoints of edges that still relaxed after |V|-1 passes.
    pub negative_cycle_nodes: Vec<K>,
}

struct Relaxation {
    dist: Vec<f64>,
    prev: Vec<Option<NodeIndex>>,
    cycle_nodes: Vec<NodeIndex>,
}

impl Relaxation {
    fn has_cycle(&self) -> bool {
        !self.cycle_nodes.is_empty()
    }
}

/// Shortest distances from `source`, tolerating negative edge weights.
pub fn bellman_ford<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    source: &K,
) -> Result<BellmanFordOutcome<K>> {
    let s = graph.require(source)?;
    let relax = relax_all(graph, s);

    let mut distances = NodeMap::default();
    for (i, &d) in relax.dist.iter().enumerate() {
        if d.is_finite() {
            distances.insert(graph.key_of(NodeIndex(i)).clone(), d);
        }
    }
    Ok(BellmanFordOutcome {
        distances,
        has_negative_cycle: relax.has_cycle(),
        negative_cycle_nodes: relax
            .cycle_nodes
            .iter()
            .map(|&v| graph.key_of(v).clone())
            .collect(),
    })
}

/// Materializes the shortest path to `target`. Fails with
/// [`GraphError::NegativeCycle`] when a reachable negative cycle makes the
/// notion of a shortest distance undefined.
pub fn bellman_ford_path<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    source: &K,
    target: &K,
) -> Result<Option<PathResult<K>>> {
    let s = graph.require(source)?;
    let t = graph.require(target)?;
    let relax = relax_all(graph, s);
    if relax.has_cycle() {
        return Err(GraphError::NegativeCycle {
            from_node: format!("{source:?}"),
        });
    }
    if !relax.dist[t.0].is_finite() {
        return Ok(None);
    }

    let mut path = Vec::new();
    let mut cursor = Some(t);
    while let Some(v) = cursor {
        path.push(graph.key_of(v).clone());
        cursor = relax.prev[v.0];
    }
    path.reverse();
    Ok(Some(PathResult {
        distance: relax.dist[t.0],
        path,
    }))
}

/// Whether the graph contains a negative cycle anywhere. A cycle may sit in
/// a part of the graph unreachable from any single start, so the probe
/// restarts from an unchecked node until every node has been covered.
pub fn has_negative_cycle<K: Key, V, E>(graph: &Graph<K, V, E>) -> bool {
    let n = graph.node_count();
    let mut checked = vec![false; n];
    for start in 0..n {
        if checked[start] {
            continue;
        }
        let relax = relax_all(graph, NodeIndex(start));
        if relax.has_cycle() {
            return true;
        }
        for (i, d) in relax.dist.iter().enumerate() {
            if d.is_finite() {
                checked[i] = true;
            }
        }
    }
    false
}

/// |V|-1 relaxation passes over every edge, short-circuiting when a pass
/// improves nothing, then one detection pass: any edge that would still
/// relax marks its endpoints as touched by a negative cycle.
fn relax_all<K: Key, V, E>(graph: &Graph<K, V, E>, source: NodeIndex) -> Relaxation {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
    dist[source.0] = 0.0;

    let directed = graph.is_directed();
    for pass in 1..n {
        let mut improved = false;
        for edge in 0..graph.edge_count() {
            let e = EdgeIndex(edge);
            let (u, v) = graph.endpoints_of(e);
            let w = graph.weight_of(e);
            improved |= relax_one(&mut dist, &mut prev, u, v, w);
            if !directed {
                improved |= relax_one(&mut dist, &mut prev, v, u, w);
            }
        }
        if !improved {
            debug!(pass, total = n - 1, "bellman-ford converged early");
            break;
        }
    }

    let mut cycle_nodes = Vec::new();
    let mut flagged = vec![false; n];
    for edge in 0..graph.edge_count() {
        let e = EdgeIndex(edge);
        let (u, v) = graph.endpoints_of(e);
        let w = graph.weight_of(e);
        let mut check = |a: NodeIndex, b: NodeIndex| {
            if dist[a.0].is_finite() && dist[a.0] + w < dist[b.0] {
                for x in [a, b] {
                    if !flagged[x.0] {
                        flagged[x.0] = true;
                        cycle_nodes.push(x);
                    }
                }
            }
        };
        check(u, v);
        if !directed {
            check(v, u);
        }
    }

    Relaxation {
        dist,
        prev,
        cycle_nodes,
    }
}

fn relax_one(
    dist: &mut [f64],
    prev: &mut [Option<NodeIndex>],
    u: NodeIndex,
    v: NodeIndex,
    w: f64,
) -> bool {
    if dist[u.0].is_finite() && dist[u.0] + w < dist[v.0] {
        dist[v.0] = dist[u.0] + w;
        prev[v.0] = Some(u);
        true
    } else {
        false
    }
}
