//! The shared graph data model.
//!
//! Nodes and edges live in flat index-addressed tables; adjacency is stored
//! as lists of indices, never as object references. Keys map to dense
//! [`NodeIndex`] values through an insertion-ordered table, so node and edge
//! enumeration order is deterministic and caller-visible.

use std::fmt::{self, Debug};
use std::hash::Hash;

use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Bound for node identifiers: integers, strings, and anything else that
/// hashes and totally orders.
pub trait Key: Clone + Eq + Hash + Ord + Debug {}
impl<T: Clone + Eq + Hash + Ord + Debug> Key for T {}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which incident edges a degree query counts on a directed graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
    #[default]
    Total,
}

/// Insertion-ordered mapping keyed by node id; the standard shape of
/// per-node results.
pub type NodeMap<K, T> = IndexMap<K, T, ahash::RandomState>;

/// Insertion-ordered mapping keyed by an edge's endpoint pair.
pub type EdgeMap<K, T> = IndexMap<(K, K), T, ahash::RandomState>;

#[derive(Clone, Debug)]
struct NodeRecord<K, V> {
    key: K,
    payload: Option<V>,
    /// Outgoing `(neighbor, edge)` pairs; for an undirected graph this is
    /// the full neighborhood.
    out: Vec<(NodeIndex, EdgeIndex)>,
    /// Incoming pairs; empty for undirected graphs.
    inc: Vec<(NodeIndex, EdgeIndex)>,
}

#[derive(Clone, Debug)]
struct EdgeRecord<E> {
    source: NodeIndex,
    target: NodeIndex,
    weight: f64,
    payload: Option<E>,
}

/// A borrowed view of one stored edge.
#[derive(Clone, Copy, Debug)]
pub struct EdgeRef<'g, K, E> {
    pub source: &'g K,
    pub target: &'g K,
    pub weight: f64,
    pub payload: Option<&'g E>,
}

/// A graph with identifier type `K`, optional node payloads `V` and optional
/// edge payloads `E`.
///
/// The `directed` flag is fixed at construction. The `weighted` flag latches
/// when the first explicitly weighted edge is added. All query methods are
/// pure; only the insertion methods mutate.
#[derive(Clone, Debug)]
pub struct Graph<K, V = (), E = ()> {
    directed: bool,
    weighted: bool,
    indices: IndexMap<K, NodeIndex, ahash::RandomState>,
    nodes: Vec<NodeRecord<K, V>>,
    edges: Vec<EdgeRecord<E>>,
    pairs: AHashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

impl<K: Key, V, E> Default for Graph<K, V, E> {
    fn default() -> Self {
        Self::undirected()
    }
}

impl<K: Key, V, E> Graph<K, V, E> {
    pub fn directed() -> Self {
        Self::with_kind(true)
    }

    pub fn undirected() -> Self {
        Self::with_kind(false)
    }

    fn with_kind(directed: bool) -> Self {
        Graph {
            directed,
            weighted: false,
            indices: IndexMap::default(),
            nodes: Vec::new(),
            edges: Vec::new(),
            pairs: AHashMap::new(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_node(&self, key: &K) -> bool {
        self.indices.contains_key(key)
    }

    /// Inserts a node without a payload, returning its dense index. Inserting
    /// an existing key is a no-op that returns the existing index.
    pub fn add_node(&mut self, key: K) -> NodeIndex {
        self.insert_node(key, None)
    }

    /// Inserts a node carrying a payload. Re-inserting an existing key
    /// replaces its payload.
    pub fn add_node_with(&mut self, key: K, payload: V) -> NodeIndex {
        self.insert_node(key, Some(payload))
    }

    fn insert_node(&mut self, key: K, payload: Option<V>) -> NodeIndex {
        if let Some(&idx) = self.indices.get(&key) {
            if payload.is_some() {
                self.nodes[idx.0].payload = payload;
            }
            return idx;
        }
        let idx = NodeIndex(self.nodes.len());
        self.indices.insert(key.clone(), idx);
        self.nodes.push(NodeRecord {
            key,
            payload,
            out: Vec::new(),
            inc: Vec::new(),
        });
        idx
    }

    /// Inserts an edge with the default weight of 1. Missing endpoints are
    /// inserted as payload-less nodes. Re-adding an existing endpoint pair
    /// updates the stored weight and payload in place.
    pub fn add_edge(&mut self, source: K, target: K) -> EdgeIndex {
        self.insert_edge(source, target, None, None)
    }

    /// Inserts an edge with an explicit weight, latching the graph's
    /// `weighted` flag.
    pub fn add_edge_weighted(&mut self, source: K, target: K, weight: f64) -> EdgeIndex {
        self.insert_edge(source, target, Some(weight), None)
    }

    /// Inserts a weighted edge carrying a payload.
    pub fn add_edge_with(&mut self, source: K, target: K, weight: f64, payload: E) -> EdgeIndex {
        self.insert_edge(source, target, Some(weight), Some(payload))
    }

    fn insert_edge(
        &mut self,
        source: K,
        target: K,
        weight: Option<f64>,
        payload: Option<E>,
    ) -> EdgeIndex {
        let s = self.insert_node(source, None);
        let t = self.insert_node(target, None);
        if weight.is_some() {
            self.weighted = true;
        }
        let weight = weight.unwrap_or(DEFAULT_EDGE_WEIGHT);
        let pair = self.pair_key(s, t);
        if let Some(&idx) = self.pairs.get(&pair) {
            let record = &mut self.edges[idx.0];
            record.weight = weight;
            if payload.is_some() {
                record.payload = payload;
            }
            return idx;
        }
        let idx = EdgeIndex(self.edges.len());
        self.edges.push(EdgeRecord {
            source: s,
            target: t,
            weight,
            payload,
        });
        self.pairs.insert(pair, idx);
        self.nodes[s.0].out.push((t, idx));
        if self.directed {
            self.nodes[t.0].inc.push((s, idx));
        } else if s != t {
            self.nodes[t.0].out.push((s, idx));
        }
        idx
    }

    /// Canonical lookup key for an endpoint pair: ordered as given when
    /// directed, smaller index first when undirected.
    fn pair_key(&self, s: NodeIndex, t: NodeIndex) -> (NodeIndex, NodeIndex) {
        if self.directed || s <= t {
            (s, t)
        } else {
            (t, s)
        }
    }

    /// Node keys in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &K> {
        self.nodes.iter().map(|n| &n.key)
    }

    /// Edges in insertion order. Each undirected edge appears exactly once.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, K, E>> {
        self.edges.iter().map(|e| EdgeRef {
            source: &self.nodes[e.source.0].key,
            target: &self.nodes[e.target.0].key,
            weight: e.weight,
            payload: e.payload.as_ref(),
        })
    }

    /// The edge between `source` and `target`, if present. For undirected
    /// graphs the endpoint order does not matter.
    pub fn get_edge(&self, source: &K, target: &K) -> Result<Option<EdgeRef<'_, K, E>>> {
        let s = self.require(source)?;
        let t = self.require(target)?;
        Ok(self.pairs.get(&self.pair_key(s, t)).map(|&idx| {
            let e = &self.edges[idx.0];
            EdgeRef {
                source: &self.nodes[e.source.0].key,
                target: &self.nodes[e.target.0].key,
                weight: e.weight,
                payload: e.payload.as_ref(),
            }
        }))
    }

    /// Neighbors reachable along outgoing edges, in edge-insertion order.
    /// For undirected graphs this is the full neighborhood.
    pub fn neighbors<'g>(&'g self, key: &K) -> Result<impl Iterator<Item = &'g K> + 'g> {
        let idx = self.require(key)?;
        Ok(self.nodes[idx.0].out.iter().map(|(n, _)| &self.nodes[n.0].key))
    }

    /// Neighbors along incoming edges. Identical to [`Graph::neighbors`] on
    /// an undirected graph.
    pub fn in_neighbors<'g>(&'g self, key: &K) -> Result<impl Iterator<Item = &'g K> + 'g> {
        let idx = self.require(key)?;
        let list = if self.directed {
            &self.nodes[idx.0].inc
        } else {
            &self.nodes[idx.0].out
        };
        Ok(list.iter().map(|(n, _)| &self.nodes[n.0].key))
    }

    /// Total incident edge count: in + out on a directed graph.
    pub fn degree(&self, key: &K) -> Result<usize> {
        self.degree_in_direction(key, Direction::Total)
    }

    pub fn in_degree(&self, key: &K) -> Result<usize> {
        self.degree_in_direction(key, Direction::In)
    }

    pub fn out_degree(&self, key: &K) -> Result<usize> {
        self.degree_in_direction(key, Direction::Out)
    }

    pub fn degree_in_direction(&self, key: &K, direction: Direction) -> Result<usize> {
        let idx = self.require(key)?;
        Ok(self.degree_of(idx, direction))
    }

    /// Payload attached to a node, if any.
    pub fn node_payload(&self, key: &K) -> Result<Option<&V>> {
        let idx = self.require(key)?;
        Ok(self.nodes[idx.0].payload.as_ref())
    }

    // ---- dense-index surface used by the algorithm modules ----

    pub fn index_of(&self, key: &K) -> Option<NodeIndex> {
        self.indices.get(key).copied()
    }

    pub fn key_of(&self, idx: NodeIndex) -> &K {
        &self.nodes[idx.0].key
    }

    pub(crate) fn require(&self, key: &K) -> Result<NodeIndex> {
        self.index_of(key)
            .ok_or_else(|| GraphError::node_not_found(key))
    }

    pub(crate) fn out_edges(&self, idx: NodeIndex) -> &[(NodeIndex, EdgeIndex)] {
        &self.nodes[idx.0].out
    }

    pub(crate) fn in_edges(&self, idx: NodeIndex) -> &[(NodeIndex, EdgeIndex)] {
        if self.directed {
            &self.nodes[idx.0].inc
        } else {
            &self.nodes[idx.0].out
        }
    }

    pub(crate) fn degree_of(&self, idx: NodeIndex, direction: Direction) -> usize {
        let node = &self.nodes[idx.0];
        if !self.directed {
            return node.out.len();
        }
        match direction {
            Direction::In => node.inc.len(),
            Direction::Out => node.out.len(),
            Direction::Total => node.out.len() + node.inc.len(),
        }
    }

    pub(crate) fn weight_of(&self, idx: EdgeIndex) -> f64 {
        self.edges[idx.0].weight
    }

    pub(crate) fn edge_payload_of(&self, idx: EdgeIndex) -> Option<&E> {
        self.edges[idx.0].payload.as_ref()
    }

    pub(crate) fn node_payload_of(&self, idx: NodeIndex) -> Option<&V> {
        self.nodes[idx.0].payload.as_ref()
    }

    pub(crate) fn endpoints_of(&self, idx: EdgeIndex) -> (NodeIndex, NodeIndex) {
        let e = &self.edges[idx.0];
        (e.source, e.target)
    }

    pub(crate) fn edge_index_between(&self, s: NodeIndex, t: NodeIndex) -> Option<EdgeIndex> {
        self.pairs.get(&self.pair_key(s, t)).copied()
    }

    /// Out- and in-incident `(neighbor, edge)` pairs chained, for walks that
    /// ignore direction on a directed graph.
    pub(crate) fn undirected_edges(
        &self,
        idx: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, EdgeIndex)> + '_ {
        let node = &self.nodes[idx.0];
        let inc: &[(NodeIndex, EdgeIndex)] = if self.directed { &node.inc } else { &[] };
        node.out.iter().chain(inc.iter()).copied()
    }
}
