//! Spectral clustering: Laplacian construction, approximate
//! eigendecomposition and k-means on the resulting embedding.

use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::graph::{EdgeIndex, Graph, Key, NodeIndex};

pub mod eigen;
pub mod kmeans;

/// Which Laplacian the embedding is computed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaplacianKind {
    /// D - A.
    Unnormalized,
    /// I - D^{-1/2} A D^{-1/2}.
    #[default]
    Symmetric,
    /// I - D^{-1} A.
    RandomWalk,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpectralConfig {
    pub clusters: usize,
    pub laplacian: LaplacianKind,
    /// Cap shared by the power iteration and the k-means loop.
    pub max_iterations: usize,
    pub tolerance: f64,
    /// Seed for centroid and start-vector randomness; a fixed seed makes
    /// runs reproducible.
    pub seed: Option<u64>,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        SpectralConfig {
            clusters: 2,
            laplacian: LaplacianKind::default(),
            max_iterations: 300,
            tolerance: 1e-4,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpectralResult<K> {
    /// Non-empty clusters, ordered by their first member in node order.
    pub clusters: Vec<Vec<K>>,
    /// Approximate eigenvalues backing the embedding; `None` when the
    /// eigendecomposition was skipped. For k <= 3 the non-zero entries are
    /// fixed placeholders (0.1, 0.2), not computed Rayleigh quotients.
    pub eigenvalues: Option<Vec<f64>>,
}

/// Partitions the nodes into `config.clusters` groups.
///
/// Fails with [`GraphError::InvalidParameter`] when `clusters` is zero.
/// When `clusters >= n` every node becomes its own singleton cluster and no
/// eigendecomposition runs.
pub fn spectral_clustering<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    config: &SpectralConfig,
) -> Result<SpectralResult<K>> {
    let k = config.clusters;
    if k == 0 {
        return Err(GraphError::InvalidParameter {
            name: "clusters",
            reason: "cluster count must be positive".into(),
        });
    }
    let n = graph.node_count();
    if n == 0 {
        return Ok(SpectralResult {
            clusters: Vec::new(),
            eigenvalues: None,
        });
    }
    if k >= n {
        return Ok(SpectralResult {
            clusters: graph.nodes().map(|key| vec![key.clone()]).collect(),
            eigenvalues: None,
        });
    }

    let lap = laplacian_matrix(graph, config.laplacian);
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let (vectors, eigenvalues) = eigen::smallest_eigenvectors(
        &lap,
        k,
        config.max_iterations,
        config.tolerance,
        &mut rng,
    );

    // node embedding: one row per node across the k eigenvectors
    let mut points: Vec<Vec<f64>> = (0..n)
        .map(|i| vectors.iter().map(|v| v[i]).collect())
        .collect();
    if config.laplacian != LaplacianKind::Unnormalized {
        for row in points.iter_mut() {
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > f64::EPSILON {
                row.iter_mut().for_each(|x| *x /= norm);
            }
        }
    }

    let assignment = kmeans::kmeans(
        &points,
        k,
        config.max_iterations,
        config.tolerance,
        &mut rng,
    );

    // group by assignment; empty clusters simply never materialize
    let mut position: Vec<Option<usize>> = vec![None; k];
    let mut clusters: Vec<Vec<K>> = Vec::new();
    for (i, &c) in assignment.iter().enumerate() {
        let key = graph.key_of(NodeIndex(i)).clone();
        match position[c] {
            Some(slot) => clusters[slot].push(key),
            None => {
                position[c] = Some(clusters.len());
                clusters.push(vec![key]);
            }
        }
    }

    Ok(SpectralResult {
        clusters,
        eigenvalues: Some(eigenvalues),
    })
}

/// Symmetric weighted adjacency matrix; a directed edge contributes the
/// same weight in both directions.
pub fn adjacency_matrix<K: Key, V, E>(graph: &Graph<K, V, E>) -> Vec<Vec<f64>> {
    let n = graph.node_count();
    let mut a = vec![vec![0.0f64; n]; n];
    for edge in 0..graph.edge_count() {
        let (u, v) = graph.endpoints_of(EdgeIndex(edge));
        let w = graph.weight_of(EdgeIndex(edge));
        a[u.0][v.0] = w;
        a[v.0][u.0] = w;
    }
    a
}

/// Laplacian in the requested normalization, with zero-degree rows guarded
/// (an isolated node contributes a zero row off the diagonal).
pub fn laplacian_matrix<K: Key, V, E>(
    graph: &Graph<K, V, E>,
    kind: LaplacianKind,
) -> Vec<Vec<f64>> {
    let a = adjacency_matrix(graph);
    let n = a.len();
    let degrees: Vec<f64> = a.iter().map(|row| row.iter().sum()).collect();

    let mut lap = vec![vec![0.0f64; n]; n];
    match kind {
        LaplacianKind::Unnormalized => {
            for i in 0..n {
                for j in 0..n {
                    lap[i][j] = if i == j {
                        degrees[i] - a[i][j]
                    } else {
                        -a[i][j]
                    };
                }
            }
        }
        LaplacianKind::Symmetric => {
            let inv_sqrt: Vec<f64> = degrees
                .iter()
                .map(|&d| if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 })
                .collect();
            for i in 0..n {
                for j in 0..n {
                    let norm = a[i][j] * inv_sqrt[i] * inv_sqrt[j];
                    lap[i][j] = if i == j { 1.0 - norm } else { -norm };
                }
            }
        }
        LaplacianKind::RandomWalk => {
            let inv: Vec<f64> = degrees
                .iter()
                .map(|&d| if d > 0.0 { 1.0 / d } else { 0.0 })
                .collect();
            for i in 0..n {
                for j in 0..n {
                    let norm = a[i][j] * inv[i];
                    lap[i][j] = if i == j { 1.0 - norm } else { -norm };
                }
            }
        }
    }
    lap
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_cliques() -> Graph<u32> {
        let mut g = Graph::undirected();
        for a in 0..4u32 {
            for b in (a + 1)..4 {
                g.add_edge(a, b);
            }
        }
        for a in 4..8u32 {
            for b in (a + 1)..8 {
                g.add_edge(a, b);
            }
        }
        g.add_edge_weighted(3, 4, 0.05);
        g
    }

    fn seeded(clusters: usize) -> SpectralConfig {
        SpectralConfig {
            clusters,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn zero_clusters_is_invalid() {
        let g = two_cliques();
        assert!(matches!(
            spectral_clustering(&g, &seeded(0)),
            Err(GraphError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn k_at_least_n_gives_singletons() {
        let g = two_cliques();
        let result = spectral_clustering(&g, &seeded(8)).unwrap();
        assert_eq!(result.clusters.len(), 8);
        assert!(result.clusters.iter().all(|c| c.len() == 1));
        assert!(result.eigenvalues.is_none());
    }

    #[test]
    fn separates_two_cliques() {
        let g = two_cliques();
        let result = spectral_clustering(&g, &seeded(2)).unwrap();
        assert_eq!(result.clusters.len(), 2);
        let find = |node: u32| {
            result
                .clusters
                .iter()
                .position(|c| c.contains(&node))
                .unwrap()
        };
        for a in 0..4u32 {
            assert_eq!(find(a), find(0), "node {a}");
        }
        for a in 4..8u32 {
            assert_eq!(find(a), find(4), "node {a}");
        }
        assert_ne!(find(0), find(4));
    }

    #[test]
    fn every_node_lands_in_exactly_one_cluster() {
        let g = two_cliques();
        let result = spectral_clustering(&g, &seeded(3)).unwrap();
        let mut members: Vec<u32> = result.clusters.iter().flatten().copied().collect();
        members.sort_unstable();
        assert_eq!(members, (0..8u32).collect::<Vec<_>>());
    }

    #[test]
    fn fast_path_reports_placeholder_eigenvalues() {
        let g = two_cliques();
        let result = spectral_clustering(&g, &seeded(3)).unwrap();
        assert_eq!(result.eigenvalues, Some(vec![0.0, 0.1, 0.2]));
    }

    #[test]
    fn unnormalized_laplacian_rows_sum_to_zero() {
        let g = two_cliques();
        let lap = laplacian_matrix(&g, LaplacianKind::Unnormalized);
        for row in &lap {
            assert!(row.iter().sum::<f64>().abs() < 1e-9);
        }
    }

    #[test]
    fn empty_graph_clusters_to_nothing() {
        let g: Graph<u32> = Graph::undirected();
        let result = spectral_clustering(&g, &seeded(2)).unwrap();
        assert!(result.clusters.is_empty());
    }
}
