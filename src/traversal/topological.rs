//! Topological ordering via Kahn's algorithm.

use std::collections::VecDeque;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Key, NodeIndex};

/// Orders the nodes of a directed acyclic graph so that every edge points
/// forward in the result. Zero-in-degree nodes are released in insertion
/// order, so the output is deterministic.
///
/// Fails with [`GraphError::WrongGraphKind`] on an undirected graph and with
/// [`GraphError::CycleDetected`] when a cycle keeps some nodes from ever
/// reaching in-degree zero; the error names the stuck nodes.
pub fn topological_sort<K: Key, V, E>(graph: &Graph<K, V, E>) -> Result<Vec<K>> {
    if !graph.is_directed() {
        return Err(GraphError::wrong_kind("topological_sort", true));
    }

    let n = graph.node_count();
    let mut indeg: Vec<usize> = (0..n)
        .map(|i| graph.in_edges(NodeIndex(i)).len())
        .collect();

    let mut queue = VecDeque::new();
    for (i, &d) in indeg.iter().enumerate() {
        if d == 0 {
            queue.push_back(NodeIndex(i));
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(v) = queue.pop_front() {
        order.push(graph.key_of(v).clone());
        for &(w, _) in graph.out_edges(v) {
            indeg[w.0] -= 1;
            if indeg[w.0] == 0 {
                queue.push_back(w);
            }
        }
    }

    if order.len() != n {
        let remaining: Vec<String> = indeg
            .iter()
            .enumerate()
            .filter(|(_, &d)| d > 0)
            .map(|(i, _)| format!("{:?}", graph.key_of(NodeIndex(i))))
            .collect();
        return Err(GraphError::CycleDetected {
            processed: order.len(),
            total: n,
            remaining,
        });
    }
    Ok(order)
}
