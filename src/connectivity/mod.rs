//! Connected-component structure.

use crate::error::{GraphError, Result};
use crate::graph::{EdgeIndex, Graph, Key, NodeIndex};
use crate::union_find::UnionFind;

pub mod kcore;
pub mod tarjan;

pub use kcore::{core_numbers, k_core};
pub use tarjan::{condensation, strongly_connected_components};

/// Components of an undirected graph, via Union-Find over the edge list.
/// Fails with [`GraphError::WrongGraphKind`] on a directed graph; use
/// [`weakly_connected_components`] there.
pub fn connected_components<K: Key, V, E>(graph: &Graph<K, V, E>) -> Result<Vec<Vec<K>>> {
    if graph.is_directed() {
        return Err(GraphError::wrong_kind("connected_components", false));
    }
    Ok(components_ignoring_direction(graph))
}

/// Components of a directed graph with edge direction ignored.
pub fn weakly_connected_components<K: Key, V, E>(graph: &Graph<K, V, E>) -> Result<Vec<Vec<K>>> {
    if !graph.is_directed() {
        return Err(GraphError::wrong_kind("weakly_connected_components", true));
    }
    Ok(components_ignoring_direction(graph))
}

fn components_ignoring_direction<K: Key, V, E>(graph: &Graph<K, V, E>) -> Vec<Vec<K>> {
    let mut uf = UnionFind::new(graph.node_count());
    for edge in 0..graph.edge_count() {
        let (u, v) = graph.endpoints_of(EdgeIndex(edge));
        uf.union(u.0, v.0);
    }
    uf.components()
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|i| graph.key_of(NodeIndex(i)).clone())
                .collect()
        })
        .collect()
}

/// Whether an undirected graph is a single component. Vacuously true for
/// zero or one nodes.
pub fn is_connected<K: Key, V, E>(graph: &Graph<K, V, E>) -> Result<bool> {
    if graph.is_directed() {
        return Err(GraphError::wrong_kind("is_connected", false));
    }
    let mut uf = UnionFind::new(graph.node_count());
    for edge in 0..graph.edge_count() {
        let (u, v) = graph.endpoints_of(EdgeIndex(edge));
        uf.union(u.0, v.0);
    }
    Ok(uf.set_count() <= 1)
}

/// Whether every node of a directed graph reaches every other.
pub fn is_strongly_connected<K: Key, V, E>(graph: &Graph<K, V, E>) -> Result<bool> {
    if !graph.is_directed() {
        return Err(GraphError::wrong_kind("is_strongly_connected", true));
    }
    Ok(strongly_connected_components(graph)?.len() <= 1)
}
