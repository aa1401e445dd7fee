//! Cross-algorithm invariants checked over randomly generated graphs.

use proptest::prelude::*;

use redpoll::centrality::{degree_centrality, DegreeOptions};
use redpoll::community::{louvain, modularity, LouvainConfig};
use redpoll::connectivity::connected_components;
use redpoll::graph::{Graph, NodeMap};
use redpoll::isomorphism::is_isomorphic;
use redpoll::mst::kruskal;
use redpoll::paths::{bellman_ford, dijkstra};
use redpoll::traversal::has_cycle;
use redpoll::union_find::UnionFind;

fn undirected_graph(
    max_nodes: u32,
    max_edges: usize,
) -> impl Strategy<Value = Graph<u32>> {
    (2..=max_nodes).prop_flat_map(move |n| {
        proptest::collection::vec(((0..n), (0..n)), 0..=max_edges).prop_map(move |pairs| {
            let mut g = Graph::undirected();
            for i in 0..n {
                g.add_node(i);
            }
            for (a, b) in pairs {
                if a != b {
                    g.add_edge(a, b);
                }
            }
            g
        })
    })
}

fn weighted_undirected_graph(
    max_nodes: u32,
    max_edges: usize,
) -> impl Strategy<Value = Graph<u32>> {
    (2..=max_nodes).prop_flat_map(move |n| {
        proptest::collection::vec(((0..n), (0..n), 1..10u32), 0..=max_edges).prop_map(
            move |triples| {
                let mut g = Graph::undirected();
                for i in 0..n {
                    g.add_node(i);
                }
                for (a, b, w) in triples {
                    if a != b {
                        g.add_edge_weighted(a, b, w as f64);
                    }
                }
                g
            },
        )
    })
}

proptest! {
    /// Connected components are pairwise disjoint and cover the node set
    /// exactly once.
    #[test]
    fn components_partition_the_nodes(g in undirected_graph(12, 20)) {
        let comps = connected_components(&g).unwrap();
        let mut seen: Vec<u32> = comps.iter().flatten().copied().collect();
        seen.sort_unstable();
        let mut expected: Vec<u32> = g.nodes().copied().collect();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    /// Sum of unnormalized degrees equals twice the edge count.
    #[test]
    fn degree_sum_is_twice_edge_count(g in undirected_graph(12, 20)) {
        let total: f64 = degree_centrality(&g, DegreeOptions::default()).values().sum();
        prop_assert_eq!(total, 2.0 * g.edge_count() as f64);
    }

    /// With non-negative weights, Dijkstra and Bellman-Ford agree on every
    /// finite distance.
    #[test]
    fn dijkstra_agrees_with_bellman_ford(g in weighted_undirected_graph(10, 18)) {
        let source = 0u32;
        let dj = dijkstra(&g, &source).unwrap();
        let bf = bellman_ford(&g, &source).unwrap();
        prop_assert!(!bf.has_negative_cycle);
        prop_assert_eq!(dj.len(), bf.distances.len());
        for (node, d) in &dj {
            let other = bf.distances[node];
            prop_assert!((d - other).abs() < 1e-9, "node {}: {} vs {}", node, d, other);
        }
    }

    /// Kruskal yields |V|-1 edges, no cycle, and a total weight no worse
    /// than any spanning edge subset found by brute force.
    #[test]
    fn kruskal_is_minimal_on_small_graphs(g in weighted_undirected_graph(6, 10)) {
        match kruskal(&g) {
            Ok(tree) => {
                prop_assert_eq!(tree.edges.len(), g.node_count() - 1);
                let mut check: Graph<u32> = Graph::undirected();
                for node in g.nodes() {
                    check.add_node(*node);
                }
                for edge in &tree.edges {
                    check.add_edge_weighted(edge.source, edge.target, edge.weight);
                }
                prop_assert!(!has_cycle(&check));
                let best = brute_force_mst_weight(&g).expect("tree exists");
                prop_assert!(tree.total_weight <= best + 1e-9,
                    "kruskal {} vs brute force {}", tree.total_weight, best);
            }
            Err(_) => {
                // must really be disconnected
                prop_assert!(connected_components(&g).unwrap().len() > 1);
            }
        }
    }

    /// Every graph is isomorphic to itself and to any relabeling of itself.
    #[test]
    fn isomorphism_is_reflexive_and_survives_relabeling(
        g in undirected_graph(6, 10),
        salt in 0..1000u32,
    ) {
        prop_assert!(is_isomorphic(&g, &g));

        // permute ids deterministically from the salt
        let n = g.node_count() as u32;
        let relabel = |v: u32| (v + salt) % n;
        let mut h: Graph<u32> = Graph::undirected();
        for node in g.nodes() {
            h.add_node(relabel(*node));
        }
        for edge in g.edges() {
            h.add_edge(relabel(*edge.source), relabel(*edge.target));
        }
        prop_assert!(is_isomorphic(&g, &h));
    }

    /// Louvain's partition is never worse than leaving every node alone.
    #[test]
    fn louvain_beats_singletons(g in weighted_undirected_graph(10, 18)) {
        prop_assume!(g.edge_count() > 0);
        let result = louvain(&g, &LouvainConfig::default());
        let mut singletons = NodeMap::default();
        for (i, node) in g.nodes().enumerate() {
            singletons.insert(*node, i);
        }
        let baseline = modularity(&g, &singletons, 1.0);
        prop_assert!(result.modularity >= baseline - 1e-9,
            "louvain {} vs singleton {}", result.modularity, baseline);
    }
}

/// Cheapest spanning |V|-1-edge subset by exhaustive search; `None` when no
/// subset spans.
fn brute_force_mst_weight(g: &Graph<u32>) -> Option<f64> {
    let nodes: Vec<u32> = g.nodes().copied().collect();
    let edges: Vec<(u32, u32, f64)> = g
        .edges()
        .map(|e| (*e.source, *e.target, e.weight))
        .collect();
    let n = nodes.len();
    let m = edges.len();
    if n == 0 {
        return Some(0.0);
    }
    let index_of = |v: u32| nodes.iter().position(|&x| x == v).unwrap();

    let mut best: Option<f64> = None;
    for mask in 0u32..(1 << m) {
        if mask.count_ones() as usize != n - 1 {
            continue;
        }
        let mut uf = UnionFind::new(n);
        let mut weight = 0.0;
        for (i, &(a, b, w)) in edges.iter().enumerate() {
            if mask & (1 << i) != 0 {
                uf.union(index_of(a), index_of(b));
                weight += w;
            }
        }
        if uf.set_count() == 1 && best.map_or(true, |b| weight < b) {
            best = Some(weight);
        }
    }
    best
}
