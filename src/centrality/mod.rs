//! Node-importance measures.

pub mod betweenness;
pub mod closeness;
pub mod degree;
pub mod eigenvector;
pub mod katz;
pub mod pagerank;

pub use betweenness::{
    betweenness_centrality, edge_betweenness_centrality, BetweennessOptions,
};
pub use closeness::closeness_centrality;
pub use degree::{degree_centrality, DegreeOptions};
pub use eigenvector::{eigenvector_centrality, EigenvectorConfig};
pub use katz::{katz_centrality, KatzConfig};
pub use pagerank::{pagerank, PageRankConfig};
