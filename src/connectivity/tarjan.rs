//! Tarjan's strongly-connected components and the condensation graph.

use ahash::AHashSet;
use bitvec::vec::BitVec;

use crate::error::{GraphError, Result};
use crate::graph::{EdgeIndex, Graph, Key, NodeIndex};

struct Frame {
    node: NodeIndex,
    child: usize,
}

/// Strongly connected components of a directed graph, emitted in the order
/// Tarjan's walk completes them (reverse topological over the condensation).
///
/// The depth-first walk runs on an explicit frame stack, so component size
/// is bounded by memory rather than call-stack depth.
pub fn strongly_connected_components<K: Key, V, E>(
    graph: &Graph<K, V, E>,
) -> Result<Vec<Vec<K>>> {
    if !graph.is_directed() {
        return Err(GraphError::wrong_kind("strongly_connected_components", true));
    }
    Ok(scc_indices(graph)
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|v| graph.key_of(v).clone())
                .collect()
        })
        .collect())
}

fn scc_indices<K: Key, V, E>(graph: &Graph<K, V, E>) -> Vec<Vec<NodeIndex>> {
    let n = graph.node_count();
    let mut index = vec![-1i64; n];
    let mut lowlink = vec![0i64; n];
    let mut on_stack = BitVec::repeat(false, n);
    let mut stack: Vec<NodeIndex> = Vec::new();
    let mut next_index = 0i64;
    let mut components = Vec::new();

    for root in 0..n {
        if index[root] >= 0 {
            continue;
        }
        let mut frames = Vec::new();
        enter(
            NodeIndex(root),
            &mut frames,
            &mut index,
            &mut lowlink,
            &mut on_stack,
            &mut stack,
            &mut next_index,
        );
        while let Some(frame) = frames.last_mut() {
            let v = frame.node;
            let out = graph.out_edges(v);
            if frame.child < out.len() {
                let (w, _) = out[frame.child];
                frame.child += 1;
                if index[w.0] < 0 {
                    enter(
                        w,
                        &mut frames,
                        &mut index,
                        &mut lowlink,
                        &mut on_stack,
                        &mut stack,
                        &mut next_index,
                    );
                } else if on_stack[w.0] {
                    lowlink[v.0] = lowlink[v.0].min(index[w.0]);
                }
            } else {
                frames.pop();
                if let Some(parent) = frames.last() {
                    lowlink[parent.node.0] = lowlink[parent.node.0].min(lowlink[v.0]);
                }
                if lowlink[v.0] == index[v.0] {
                    // pop the stack down to and including v: one component
                    let mut component = Vec::new();
                    loop {
                        let w = stack.pop().expect("tarjan stack underflow");
                        on_stack.set(w.0, false);
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }
    }
    components
}

fn enter(
    v: NodeIndex,
    frames: &mut Vec<Frame>,
    index: &mut [i64],
    lowlink: &mut [i64],
    on_stack: &mut BitVec,
    stack: &mut Vec<NodeIndex>,
    next_index: &mut i64,
) {
    index[v.0] = *next_index;
    lowlink[v.0] = *next_index;
    *next_index += 1;
    stack.push(v);
    on_stack.set(v.0, true);
    frames.push(Frame { node: v, child: 0 });
}

/// Builds a fresh directed graph with one node per strongly connected
/// component. Node keys are component positions in the
/// [`strongly_connected_components`] order and payloads carry the member
/// keys; inter-component edges are de-duplicated. The input is not touched.
pub fn condensation<K: Key, V, E>(graph: &Graph<K, V, E>) -> Result<Graph<usize, Vec<K>>> {
    if !graph.is_directed() {
        return Err(GraphError::wrong_kind("condensation", true));
    }
    let components = scc_indices(graph);
    let mut member_of = vec![0usize; graph.node_count()];
    for (c, component) in components.iter().enumerate() {
        for &v in component {
            member_of[v.0] = c;
        }
    }

    let mut condensed: Graph<usize, Vec<K>> = Graph::directed();
    for (c, component) in components.iter().enumerate() {
        let members: Vec<K> = component.iter().map(|&v| graph.key_of(v).clone()).collect();
        condensed.add_node_with(c, members);
    }
    let mut seen: AHashSet<(usize, usize)> = AHashSet::new();
    for edge in 0..graph.edge_count() {
        let (u, v) = graph.endpoints_of(EdgeIndex(edge));
        let (cu, cv) = (member_of[u.0], member_of[v.0]);
        if cu != cv && seen.insert((cu, cv)) {
            condensed.add_edge(cu, cv);
        }
    }
    Ok(condensed)
}
