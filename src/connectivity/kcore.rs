//! k-core decomposition by degree peeling.

use crate::graph::{Graph, Key, NodeIndex, NodeMap};

/// Core number of every node: the largest k such that the node belongs to a
/// subgraph where every member has at least k neighbors inside it.
/// Direction is ignored. Batagelj-Zaversnik peeling over degree bins, O(V+E).
pub fn core_numbers<K: Key, V, E>(graph: &Graph<K, V, E>) -> NodeMap<K, usize> {
    let n = graph.node_count();
    let mut degree: Vec<usize> = (0..n)
        .map(|i| graph.undirected_edges(NodeIndex(i)).count())
        .collect();
    let max_degree = degree.iter().copied().max().unwrap_or(0);

    // nodes bucketed by current degree, lowest first
    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); max_degree + 1];
    for (i, &d) in degree.iter().enumerate() {
        bins[d].push(i);
    }

    let mut core = vec![0usize; n];
    let mut removed = vec![false; n];
    let mut current = 0usize;
    for d in 0..=max_degree {
        // peeling can push nodes into lower bins, so each bin is drained
        // as a worklist
        while let Some(i) = bins[d].pop() {
            if removed[i] || degree[i] != d {
                continue;
            }
            removed[i] = true;
            current = current.max(d);
            core[i] = current;
            for (w, _) in graph.undirected_edges(NodeIndex(i)) {
                if !removed[w.0] && degree[w.0] > d {
                    degree[w.0] -= 1;
                    bins[degree[w.0]].push(w.0);
                }
            }
        }
    }

    let mut out = NodeMap::default();
    for (i, &c) in core.iter().enumerate() {
        out.insert(graph.key_of(NodeIndex(i)).clone(), c);
    }
    out
}

/// The nodes of the k-core: the maximal subgraph in which every node has at
/// least `k` neighbors. Empty when no such subgraph exists.
pub fn k_core<K: Key, V, E>(graph: &Graph<K, V, E>, k: usize) -> Vec<K> {
    core_numbers(graph)
        .into_iter()
        .filter(|&(_, c)| c >= k)
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn triangle_with_tail() -> Graph<u32> {
        // triangle 0-1-2 with a pendant path 2-3-4
        let mut g = Graph::undirected();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 0);
        g.add_edge(2, 3);
        g.add_edge(3, 4);
        g
    }

    #[test]
    fn triangle_is_the_two_core() {
        let g = triangle_with_tail();
        let cores = core_numbers(&g);
        assert_eq!(cores[&0], 2);
        assert_eq!(cores[&1], 2);
        assert_eq!(cores[&2], 2);
        assert_eq!(cores[&3], 1);
        assert_eq!(cores[&4], 1);
    }

    #[test]
    fn k_core_extraction() {
        let g = triangle_with_tail();
        let mut two_core = k_core(&g, 2);
        two_core.sort_unstable();
        assert_eq!(two_core, vec![0, 1, 2]);
        assert!(k_core(&g, 3).is_empty());
        assert_eq!(k_core(&g, 0).len(), 5);
    }

    #[test]
    fn isolated_nodes_have_core_zero() {
        let mut g: Graph<u32> = Graph::undirected();
        g.add_node(9);
        g.add_edge(0, 1);
        let cores = core_numbers(&g);
        assert_eq!(cores[&9], 0);
        assert_eq!(cores[&0], 1);
    }

    #[test]
    fn complete_graph_core_is_n_minus_one() {
        let mut g: Graph<u32> = Graph::undirected();
        for a in 0..5u32 {
            for b in (a + 1)..5 {
                g.add_edge(a, b);
            }
        }
        let cores = core_numbers(&g);
        assert!(cores.values().all(|&c| c == 4));
    }

    #[test]
    fn direction_is_ignored() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 0);
        let cores = core_numbers(&g);
        assert!(cores.values().all(|&c| c == 2));
    }
}
