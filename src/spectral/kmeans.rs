//! Lloyd's k-means on the spectral embedding.

use rand::rngs::SmallRng;
use tracing::debug;

/// Clusters `points` into `k` groups. Centroids start on `k` distinct
/// randomly chosen points; iteration stops when assignments stop changing,
/// when no centroid moves more than `tolerance`, or at `max_iterations`.
/// Requires `1 <= k <= points.len()`.
pub(crate) fn kmeans(
    points: &[Vec<f64>],
    k: usize,
    max_iterations: usize,
    tolerance: f64,
    rng: &mut SmallRng,
) -> Vec<usize> {
    let n = points.len();
    debug_assert!(k >= 1 && k <= n);
    let dim = points.first().map_or(0, Vec::len);

    let mut centroids: Vec<Vec<f64>> = rand::seq::index::sample(rng, n, k)
        .into_iter()
        .map(|i| points[i].clone())
        .collect();
    let mut assignment = vec![0usize; n];

    for iteration in 1..=max_iterations {
        // assign to the nearest centroid; ties keep the lower index
        let mut changed = false;
        for (i, point) in points.iter().enumerate() {
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = squared_distance(point, centroid);
                if d < best_dist {
                    best_dist = d;
                    best = c;
                }
            }
            if assignment[i] != best {
                assignment[i] = best;
                changed = true;
            }
        }
        if !changed {
            debug!(iteration, "k-means assignments stable");
            break;
        }

        // recompute centroids; an empty cluster keeps its old position
        let mut sums = vec![vec![0.0f64; dim]; k];
        let mut counts = vec![0usize; k];
        for (point, &c) in points.iter().zip(assignment.iter()) {
            counts[c] += 1;
            for (s, x) in sums[c].iter_mut().zip(point.iter()) {
                *s += x;
            }
        }
        let mut max_shift = 0.0f64;
        for c in 0..k {
            if counts[c] == 0 {
                continue;
            }
            let mut shift = 0.0f64;
            for (old, s) in centroids[c].iter_mut().zip(sums[c].iter()) {
                let new = s / counts[c] as f64;
                shift += (new - *old) * (new - *old);
                *old = new;
            }
            max_shift = max_shift.max(shift.sqrt());
        }
        if max_shift < tolerance {
            debug!(iteration, max_shift, "k-means centroids settled");
            break;
        }
    }
    assignment
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
