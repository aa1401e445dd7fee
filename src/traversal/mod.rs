//! Breadth- and depth-first traversal and cycle detection.
//!
//! Depth-first walks use an explicit frame stack carrying the node and its
//! child-iteration position, so traversal depth is bounded by heap memory
//! rather than the native call stack.

use std::collections::VecDeque;

use bitvec::vec::BitVec;

use crate::error::Result;
use crate::graph::{Graph, Key, NodeIndex};

pub mod counting;
pub mod topological;

pub use counting::{shortest_path_counts, PathCounts};
pub use topological::topological_sort;

/// Breadth-first visit order from `start`, following edge direction on
/// directed graphs. Neighbors are expanded in edge-insertion order.
pub fn bfs<K: Key, V, E>(graph: &Graph<K, V, E>, start: &K) -> Result<Vec<K>> {
    let start = graph.require(start)?;
    let mut visited: BitVec = BitVec::repeat(false, graph.node_count());
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    visited.set(start.0, true);
    queue.push_back(start);
    while let Some(v) = queue.pop_front() {
        order.push(graph.key_of(v).clone());
        for &(w, _) in graph.out_edges(v) {
            if !visited[w.0] {
                visited.set(w.0, true);
                queue.push_back(w);
            }
        }
    }
    Ok(order)
}

struct Frame {
    node: NodeIndex,
    child: usize,
}

/// Depth-first pre-order from `start`. The explicit stack visits children in
/// edge-insertion order, matching what the recursive formulation would do.
pub fn dfs<K: Key, V, E>(graph: &Graph<K, V, E>, start: &K) -> Result<Vec<K>> {
    let start = graph.require(start)?;
    let mut visited: BitVec = BitVec::repeat(false, graph.node_count());
    let mut order = Vec::new();
    let mut stack = Vec::new();

    visited.set(start.0, true);
    order.push(graph.key_of(start).clone());
    stack.push(Frame {
        node: start,
        child: 0,
    });
    while let Some(frame) = stack.last_mut() {
        let out = graph.out_edges(frame.node);
        if frame.child < out.len() {
            let (w, _) = out[frame.child];
            frame.child += 1;
            if !visited[w.0] {
                visited.set(w.0, true);
                order.push(graph.key_of(w).clone());
                stack.push(Frame { node: w, child: 0 });
            }
        } else {
            stack.pop();
        }
    }
    Ok(order)
}

/// Whether the graph contains at least one cycle. Directed graphs use a
/// coloring walk (a back edge to an in-progress node is a cycle); undirected
/// graphs track the arrival edge so the immediate parent does not count.
pub fn has_cycle<K: Key, V, E>(graph: &Graph<K, V, E>) -> bool {
    if graph.is_directed() {
        has_directed_cycle(graph)
    } else {
        has_undirected_cycle(graph)
    }
}

fn has_directed_cycle<K: Key, V, E>(graph: &Graph<K, V, E>) -> bool {
    let n = graph.node_count();
    let mut visited: BitVec = BitVec::repeat(false, n);
    let mut in_progress: BitVec = BitVec::repeat(false, n);

    for root in 0..n {
        if visited[root] {
            continue;
        }
        let mut stack = vec![Frame {
            node: NodeIndex(root),
            child: 0,
        }];
        visited.set(root, true);
        in_progress.set(root, true);
        while let Some(frame) = stack.last_mut() {
            let v = frame.node;
            let out = graph.out_edges(v);
            if frame.child < out.len() {
                let (w, _) = out[frame.child];
                frame.child += 1;
                if in_progress[w.0] {
                    return true;
                }
                if !visited[w.0] {
                    visited.set(w.0, true);
                    in_progress.set(w.0, true);
                    stack.push(Frame { node: w, child: 0 });
                }
            } else {
                in_progress.set(v.0, false);
                stack.pop();
            }
        }
    }
    false
}

struct UndirectedFrame {
    node: NodeIndex,
    arrived_by: Option<crate::graph::EdgeIndex>,
    child: usize,
}

fn has_undirected_cycle<K: Key, V, E>(graph: &Graph<K, V, E>) -> bool {
    let n = graph.node_count();
    let mut visited: BitVec = BitVec::repeat(false, n);

    for root in 0..n {
        if visited[root] {
            continue;
        }
        let mut stack = vec![UndirectedFrame {
            node: NodeIndex(root),
            arrived_by: None,
            child: 0,
        }];
        visited.set(root, true);
        while let Some(frame) = stack.last_mut() {
            let out = graph.out_edges(frame.node);
            if frame.child < out.len() {
                let (w, e) = out[frame.child];
                frame.child += 1;
                if w == frame.node {
                    // self-loop
                    return true;
                }
                if frame.arrived_by == Some(e) {
                    continue;
                }
                if visited[w.0] {
                    return true;
                }
                visited.set(w.0, true);
                stack.push(UndirectedFrame {
                    node: w,
                    arrived_by: Some(e),
                    child: 0,
                });
            } else {
                stack.pop();
            }
        }
    }
    false
}
