//! # Redpoll
//!
//! Redpoll is a Rust library of classical graph algorithms over a shared
//! graph model: traversal, shortest paths, centrality, community detection,
//! connectivity, spanning trees, isomorphism and spectral clustering.
//!
//! Graphs are built by the caller ([`graph::Graph`]) and every algorithm is
//! read-only over them; results come back keyed by the caller's own node
//! identifiers. Nothing here performs I/O, spawns threads, or takes locks —
//! calls are plain synchronous functions, safe to run concurrently on
//! graphs that are not being mutated.

pub mod centrality;
pub mod community;
pub mod connectivity;
pub mod error;
pub mod graph;
pub mod isomorphism;
pub mod mst;
pub mod paths;
pub mod queue;
pub mod spectral;
pub mod traversal;
pub mod union_find;

pub use error::GraphError;
pub use graph::{Direction, EdgeIndex, Graph, NodeIndex, NodeMap};
