use thiserror::Error;

/// Failure kinds shared by every algorithm in the crate.
///
/// These are precondition errors, surfaced immediately and never retried.
/// Node keys are rendered into the variants via their `Debug` form so the
/// enum stays free of type parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {node} is not in the graph")]
    NodeNotFound { node: String },

    #[error("{algorithm} requires {expected} input, got a {found} graph")]
    WrongGraphKind {
        algorithm: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("negative edge weight {weight} on {from_node} -> {target}")]
    UnsupportedWeight {
        from_node: String,
        target: String,
        weight: f64,
    },

    #[error("shortest path from {from_node} is undefined: a reachable negative cycle exists")]
    NegativeCycle { from_node: String },

    #[error("no spanning tree: accepted {accepted} edges but {needed} are required")]
    Disconnected { accepted: usize, needed: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    #[error("not a DAG: {processed} of {total} nodes ordered, remaining with incoming edges: {remaining:?}")]
    CycleDetected {
        processed: usize,
        total: usize,
        remaining: Vec<String>,
    },
}

impl GraphError {
    pub(crate) fn node_not_found(key: &impl std::fmt::Debug) -> Self {
        GraphError::NodeNotFound {
            node: format!("{key:?}"),
        }
    }

    pub(crate) fn wrong_kind(algorithm: &'static str, expected_directed: bool) -> Self {
        let (expected, found) = if expected_directed {
            ("directed", "undirected")
        } else {
            ("undirected", "directed")
        };
        GraphError::WrongGraphKind {
            algorithm,
            expected,
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
