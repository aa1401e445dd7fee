//! Minimum spanning tree via Kruskal's algorithm.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::graph::{EdgeIndex, Graph, Key};
use crate::union_find::UnionFind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MstEdge<K> {
    pub source: K,
    pub target: K,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningTree<K> {
    pub edges: Vec<MstEdge<K>>,
    pub total_weight: f64,
}

/// Kruskal's greedy tree: edges sorted ascending by weight (the sort is
/// stable, so ties keep insertion order), accepted whenever their endpoints
/// are not yet connected, stopping at |V|-1 acceptances.
///
/// Fails with [`GraphError::WrongGraphKind`] on a directed graph and
/// [`GraphError::Disconnected`] when no spanning tree exists.
pub fn kruskal<K: Key, V, E>(graph: &Graph<K, V, E>) -> Result<SpanningTree<K>> {
    if graph.is_directed() {
        return Err(GraphError::wrong_kind("kruskal", false));
    }

    let n = graph.node_count();
    let needed = n.saturating_sub(1);

    // storage holds each undirected edge once, in insertion order
    let mut order: Vec<EdgeIndex> = (0..graph.edge_count()).map(EdgeIndex).collect();
    order.sort_by(|a, b| graph.weight_of(*a).total_cmp(&graph.weight_of(*b)));

    let mut uf = UnionFind::new(n);
    let mut edges = Vec::with_capacity(needed);
    let mut total_weight = 0.0;
    for e in order {
        if edges.len() == needed {
            break;
        }
        let (u, v) = graph.endpoints_of(e);
        if uf.union(u.0, v.0) {
            let weight = graph.weight_of(e);
            total_weight += weight;
            edges.push(MstEdge {
                source: graph.key_of(u).clone(),
                target: graph.key_of(v).clone(),
                weight,
            });
        }
    }

    if edges.len() < needed {
        return Err(GraphError::Disconnected {
            accepted: edges.len(),
            needed,
        });
    }
    Ok(SpanningTree {
        edges,
        total_weight,
    })
}
