//! VF2 backtracking search for graph isomorphism.
//!
//! Search state is a pair of inverse partial mappings plus four terminal
//! tag vectors recording the depth at which a node became reachable from
//! the mapped region. Backtracking undoes a candidate pair by replaying the
//! recorded deltas, so no state is copied per step.

use itertools::Itertools;

use crate::graph::{Direction, EdgeIndex, Graph, Key, NodeIndex, NodeMap};

/// Caller-supplied compatibility predicate over node payloads.
pub type NodeMatcher<'a, V> = dyn Fn(Option<&V>, Option<&V>) -> bool + 'a;
/// Caller-supplied compatibility predicate over edge weight and payload.
pub type EdgeMatcher<'a, E> = dyn Fn(f64, Option<&E>, f64, Option<&E>) -> bool + 'a;

/// Configurable matcher; the free functions below cover the common cases.
pub struct Vf2Matcher<'g, K1: Key, K2: Key, V, E> {
    g1: &'g Graph<K1, V, E>,
    g2: &'g Graph<K2, V, E>,
    node_match: Option<Box<NodeMatcher<'g, V>>>,
    edge_match: Option<Box<EdgeMatcher<'g, E>>>,
}

/// Whether the two graphs are isomorphic.
pub fn is_isomorphic<K1: Key, K2: Key, V, E>(
    g1: &Graph<K1, V, E>,
    g2: &Graph<K2, V, E>,
) -> bool {
    Vf2Matcher::new(g1, g2).is_isomorphic()
}

/// One witnessing bijection, if the graphs are isomorphic.
pub fn find_isomorphism<K1: Key, K2: Key, V, E>(
    g1: &Graph<K1, V, E>,
    g2: &Graph<K2, V, E>,
) -> Option<NodeMap<K1, K2>> {
    Vf2Matcher::new(g1, g2).find()
}

/// Every bijection, automorphisms included; early exit is disabled.
pub fn find_all_isomorphisms<K1: Key, K2: Key, V, E>(
    g1: &Graph<K1, V, E>,
    g2: &Graph<K2, V, E>,
) -> Vec<NodeMap<K1, K2>> {
    Vf2Matcher::new(g1, g2).find_all()
}

impl<'g, K1: Key, K2: Key, V, E> Vf2Matcher<'g, K1, K2, V, E> {
    pub fn new(g1: &'g Graph<K1, V, E>, g2: &'g Graph<K2, V, E>) -> Self {
        Vf2Matcher {
            g1,
            g2,
            node_match: None,
            edge_match: None,
        }
    }

    pub fn with_node_match(
        mut self,
        f: impl Fn(Option<&V>, Option<&V>) -> bool + 'g,
    ) -> Self {
        self.node_match = Some(Box::new(f));
        self
    }

    pub fn with_edge_match(
        mut self,
        f: impl Fn(f64, Option<&E>, f64, Option<&E>) -> bool + 'g,
    ) -> Self {
        self.edge_match = Some(Box::new(f));
        self
    }

    pub fn is_isomorphic(&self) -> bool {
        self.find().is_some()
    }

    pub fn find(&self) -> Option<NodeMap<K1, K2>> {
        if !self.quick_compatible() {
            return None;
        }
        let mut state = State::new(self.g1.node_count());
        let mut results = Vec::new();
        self.search(&mut state, &mut results, false);
        results.pop().map(|core| self.to_key_map(&core))
    }

    pub fn find_all(&self) -> Vec<NodeMap<K1, K2>> {
        if !self.quick_compatible() {
            return Vec::new();
        }
        let mut state = State::new(self.g1.node_count());
        let mut results = Vec::new();
        self.search(&mut state, &mut results, true);
        results.iter().map(|core| self.to_key_map(core)).collect()
    }

    /// Cheap structural rejects before any search: node count, edge count,
    /// directedness, sorted degree sequence.
    fn quick_compatible(&self) -> bool {
        if self.g1.is_directed() != self.g2.is_directed()
            || self.g1.node_count() != self.g2.node_count()
            || self.g1.edge_count() != self.g2.edge_count()
        {
            return false;
        }
        let degrees = |n: usize, total: &dyn Fn(NodeIndex) -> usize| {
            (0..n).map(|i| total(NodeIndex(i))).sorted().collect::<Vec<_>>()
        };
        let n = self.g1.node_count();
        let d1 = degrees(n, &|v| self.total_degree_1(v));
        let d2 = degrees(n, &|v| self.total_degree_2(v));
        d1 == d2
    }

    fn total_degree_1(&self, v: NodeIndex) -> usize {
        self.g1.degree_of(v, Direction::Total)
    }

    fn total_degree_2(&self, v: NodeIndex) -> usize {
        self.g2.degree_of(v, Direction::Total)
    }

    /// Returns true when the caller asked for a single result and one was
    /// found, cutting the search short.
    fn search(&self, state: &mut State, results: &mut Vec<Vec<NodeIndex>>, find_all: bool) -> bool {
        let n = self.g1.node_count();
        if state.depth == n {
            let core: Vec<NodeIndex> = state
                .core_1
                .iter()
                .map(|m| m.expect("complete mapping"))
                .collect();
            results.push(core);
            return !find_all;
        }

        let Some(n1) = state.next_candidate() else {
            return false;
        };
        let wanted = self.total_degree_1(n1);
        for i2 in 0..n {
            let n2 = NodeIndex(i2);
            if state.core_2[i2].is_some() || self.total_degree_2(n2) != wanted {
                continue;
            }
            if !self.feasible(state, n1, n2) {
                continue;
            }
            let undo = state.push_pair(self.g1, self.g2, n1, n2);
            if self.search(state, results, find_all) {
                return true;
            }
            state.pop_pair(undo);
        }
        false
    }

    /// Feasibility of adding (n1, n2): caller predicates, self-loop parity,
    /// mapped-neighbor consistency in both directions, and exact agreement
    /// of the terminal-in/terminal-out/new counts the pair introduces.
    fn feasible(&self, state: &State, n1: NodeIndex, n2: NodeIndex) -> bool {
        if let Some(node_match) = &self.node_match {
            if !node_match(self.g1.node_payload_of(n1), self.g2.node_payload_of(n2)) {
                return false;
            }
        }

        // self-loops must agree; the neighbor loops below skip them because
        // the node itself is not yet mapped
        match (
            self.g1.edge_index_between(n1, n1),
            self.g2.edge_index_between(n2, n2),
        ) {
            (Some(e1), Some(e2)) => {
                if !self.edges_compatible(e1, e2) {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }

        // every mapped neighbor of n1 must map onto a matching neighbor of n2
        for &(w, e1) in self.g1.out_edges(n1) {
            if let Some(w2) = state.core_1[w.0] {
                match self.g2.edge_index_between(n2, w2) {
                    Some(e2) if self.edges_compatible(e1, e2) => {}
                    _ => return false,
                }
            }
        }
        for &(w, e1) in self.g1.in_edges(n1) {
            if let Some(w2) = state.core_1[w.0] {
                match self.g2.edge_index_between(w2, n2) {
                    Some(e2) if self.edges_compatible(e1, e2) => {}
                    _ => return false,
                }
            }
        }
        // and vice versa: a mapped neighbor of n2 needs the g1 edge to exist
        for &(u, _) in self.g2.out_edges(n2) {
            if let Some(u1) = state.core_2[u.0] {
                if self.g1.edge_index_between(n1, u1).is_none() {
                    return false;
                }
            }
        }
        for &(u, _) in self.g2.in_edges(n2) {
            if let Some(u1) = state.core_2[u.0] {
                if self.g1.edge_index_between(u1, n1).is_none() {
                    return false;
                }
            }
        }

        // look-ahead: unmapped neighbors split into terminal-out,
        // terminal-in and brand-new; the counts must agree exactly
        let count = |edges: &[(NodeIndex, EdgeIndex)],
                     core: &[Option<NodeIndex>],
                     tags_out: &[usize],
                     tags_in: &[usize]| {
            let (mut t_out, mut t_in, mut fresh) = (0usize, 0usize, 0usize);
            for &(w, _) in edges {
                if core[w.0].is_some() {
                    continue;
                }
                let out_tagged = tags_out[w.0] != 0;
                let in_tagged = tags_in[w.0] != 0;
                if out_tagged {
                    t_out += 1;
                }
                if in_tagged {
                    t_in += 1;
                }
                if !out_tagged && !in_tagged {
                    fresh += 1;
                }
            }
            (t_out, t_in, fresh)
        };

        let g1_out = count(
            self.g1.out_edges(n1),
            &state.core_1,
            &state.out_1,
            &state.in_1,
        );
        let g2_out = count(
            self.g2.out_edges(n2),
            &state.core_2,
            &state.out_2,
            &state.in_2,
        );
        if g1_out != g2_out {
            return false;
        }
        let g1_in = count(
            self.g1.in_edges(n1),
            &state.core_1,
            &state.out_1,
            &state.in_1,
        );
        let g2_in = count(
            self.g2.in_edges(n2),
            &state.core_2,
            &state.out_2,
            &state.in_2,
        );
        g1_in == g2_in
    }

    fn edges_compatible(
        &self,
        e1: EdgeIndex,
        e2: EdgeIndex,
    ) -> bool {
        match &self.edge_match {
            Some(edge_match) => edge_match(
                self.g1.weight_of(e1),
                self.g1.edge_payload_of(e1),
                self.g2.weight_of(e2),
                self.g2.edge_payload_of(e2),
            ),
            None => true,
        }
    }

    fn to_key_map(&self, core: &[NodeIndex]) -> NodeMap<K1, K2> {
        let mut out = NodeMap::default();
        for (i, &m) in core.iter().enumerate() {
            out.insert(
                self.g1.key_of(NodeIndex(i)).clone(),
                self.g2.key_of(m).clone(),
            );
        }
        out
    }
}

/// The mutable search state shared down the recursion.
struct State {
    core_1: Vec<Option<NodeIndex>>,
    core_2: Vec<Option<NodeIndex>>,
    /// Depth at which each node entered the respective terminal set;
    /// 0 means never.
    out_1: Vec<usize>,
    in_1: Vec<usize>,
    out_2: Vec<usize>,
    in_2: Vec<usize>,
    depth: usize,
}

/// Deltas recorded by one `push_pair`, replayed on backtrack.
struct Undo {
    n1: NodeIndex,
    n2: NodeIndex,
    out_1: Vec<usize>,
    in_1: Vec<usize>,
    out_2: Vec<usize>,
    in_2: Vec<usize>,
}

impl State {
    fn new(n: usize) -> Self {
        State {
            core_1: vec![None; n],
            core_2: vec![None; n],
            out_1: vec![0; n],
            in_1: vec![0; n],
            out_2: vec![0; n],
            in_2: vec![0; n],
            depth: 0,
        }
    }

    /// Preferred next g1 node: the lowest-index unmapped member of the out
    /// terminal set, else of the in terminal set, else any unmapped node.
    fn next_candidate(&self) -> Option<NodeIndex> {
        let unmapped = |i: &usize| self.core_1[*i].is_none();
        (0..self.core_1.len())
            .find(|&i| self.out_1[i] != 0 && unmapped(&i))
            .or_else(|| (0..self.core_1.len()).find(|&i| self.in_1[i] != 0 && unmapped(&i)))
            .or_else(|| (0..self.core_1.len()).find(unmapped))
            .map(NodeIndex)
    }

    fn push_pair<K1: Key, K2: Key, V, E>(
        &mut self,
        g1: &Graph<K1, V, E>,
        g2: &Graph<K2, V, E>,
        n1: NodeIndex,
        n2: NodeIndex,
    ) -> Undo {
        self.depth += 1;
        self.core_1[n1.0] = Some(n2);
        self.core_2[n2.0] = Some(n1);
        let mut undo = Undo {
            n1,
            n2,
            out_1: Vec::new(),
            in_1: Vec::new(),
            out_2: Vec::new(),
            in_2: Vec::new(),
        };
        let depth = self.depth;
        let mut tag = |tags: &mut Vec<usize>, touched: &mut Vec<usize>, w: NodeIndex| {
            if tags[w.0] == 0 {
                tags[w.0] = depth;
                touched.push(w.0);
            }
        };
        for &(w, _) in g1.out_edges(n1) {
            tag(&mut self.out_1, &mut undo.out_1, w);
        }
        for &(w, _) in g1.in_edges(n1) {
            tag(&mut self.in_1, &mut undo.in_1, w);
        }
        for &(w, _) in g2.out_edges(n2) {
            tag(&mut self.out_2, &mut undo.out_2, w);
        }
        for &(w, _) in g2.in_edges(n2) {
            tag(&mut self.in_2, &mut undo.in_2, w);
        }
        undo
    }

    fn pop_pair(&mut self, undo: Undo) {
        for i in undo.out_1 {
            self.out_1[i] = 0;
        }
        for i in undo.in_1 {
            self.in_1[i] = 0;
        }
        for i in undo.out_2 {
            self.out_2[i] = 0;
        }
        for i in undo.in_2 {
            self.in_2[i] = 0;
        }
        self.core_1[undo.n1.0] = None;
        self.core_2[undo.n2.0] = None;
        self.depth -= 1;
    }
}
