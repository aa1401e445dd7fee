//! Girvan-Newman divisive community detection: repeatedly remove the edge
//! carrying the most shortest-path traffic until the graph falls apart into
//! the requested number of components.

use tracing::debug;

use crate::centrality::edge_betweenness_centrality;
use crate::connectivity::connected_components;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, Key};

/// Splits an undirected graph into at least `communities` components. The
/// input is never mutated; each round recomputes edge betweenness on a
/// working copy and drops the top edge (ties keep the earliest-inserted
/// edge).
///
/// Fails with [`GraphError::WrongGraphKind`] on directed input and
/// [`GraphError::InvalidParameter`] when `communities` is zero or exceeds
/// the node count.
pub fn girvan_newman<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    communities: usize,
) -> Result<Vec<Vec<K>>> {
    if graph.is_directed() {
        return Err(GraphError::wrong_kind("girvan_newman", false));
    }
    let n = graph.node_count();
    if communities == 0 || communities > n {
        return Err(GraphError::InvalidParameter {
            name: "communities",
            reason: format!("must be in 1..={n}, got {communities}"),
        });
    }

    // working copy as a plain edge list; nodes are carried separately so
    // isolated ones survive the edge removals
    let mut working: Graph<K> = Graph::undirected();
    for key in graph.nodes() {
        working.add_node(key.clone());
    }
    for edge in graph.edges() {
        working.add_edge_weighted(edge.source.clone(), edge.target.clone(), edge.weight);
    }

    loop {
        let parts = connected_components(&working)?;
        if parts.len() >= communities {
            debug!(rounds = graph.edge_count() - working.edge_count(), "girvan-newman done");
            return Ok(parts);
        }

        let scores = edge_betweenness_centrality(&working, false);
        // strictly-greater keeps the earliest-inserted edge on ties
        let mut best: Option<((K, K), f64)> = None;
        for (pair, &score) in &scores {
            if best.as_ref().map_or(true, |(_, b)| score > *b) {
                best = Some((pair.clone(), score));
            }
        }
        let Some(((u, v), _)) = best else {
            // an edgeless graph already has n components
            return Ok(parts);
        };

        let mut next: Graph<K> = Graph::undirected();
        for key in working.nodes() {
            next.add_node(key.clone());
        }
        for edge in working.edges() {
            if (edge.source, edge.target) == (&u, &v) {
                continue;
            }
            next.add_edge_weighted(edge.source.clone(), edge.target.clone(), edge.weight);
        }
        working = next;
    }
}
