//! Shortest-path algorithms.

use serde::{Deserialize, Serialize};

pub mod bellman_ford;
pub mod dijkstra;
pub mod floyd_warshall;

pub use bellman_ford::{bellman_ford, bellman_ford_path, has_negative_cycle, BellmanFordOutcome};
pub use dijkstra::{dijkstra, dijkstra_path};
pub use floyd_warshall::floyd_warshall;

/// A materialized shortest path: its total weight and the node sequence from
/// source to target inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult<K> {
    pub distance: f64,
    pub path: Vec<K>,
}
