//! Correlation clusters
//!
//! Groups variables whose pairwise correlations are strong enough that
//! they move together. Agglomerative clustering with average linkage over
//! the distance 1 - |r|, merging while the closest pair of clusters sits
//! within the cut distance.

use crate::analyzer::CorrelationMatrix;
use serde::Serialize;

/// Largest average distance at which two clusters still merge,
/// equivalent to a 0.7 correlation cut
pub const CLUSTER_DISTANCE_THRESHOLD: f64 = 0.3;

/// A group of mutually correlated variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// 1-based id, assigned largest cluster first
    pub cluster_id: usize,
    /// Member variables in matrix order
    pub variables: Vec<String>,
    /// Number of members
    pub size: usize,
    /// Mean |r| over all member pairs
    pub avg_correlation: f64,
}

/// Group the matrix variables into clusters of size above one.
///
/// A matrix with non-finite entries yields no clusters, with a logged
/// warning; this never fails the caller.
pub fn identify_clusters(matrix: &CorrelationMatrix) -> Vec<Cluster> {
    let c = matrix.len();
    if c < 2 {
        return Vec::new();
    }
    if matrix
        .values
        .iter()
        .any(|row| row.iter().any(|v| !v.is_finite()))
    {
        log::warn!("Skipping correlation clustering: matrix has non-finite entries");
        return Vec::new();
    }

    let distance = |i: usize, j: usize| 1.0 - matrix.values[i][j].abs();

    let mut groups: Vec<Vec<usize>> = (0..c).map(|i| vec![i]).collect();
    while groups.len() > 1 {
        let mut best = (0usize, 1usize);
        let mut best_distance = f64::INFINITY;
        for a in 0..groups.len() {
            for b in a + 1..groups.len() {
                let mut sum = 0.0;
                let mut count = 0usize;
                for &i in &groups[a] {
                    for &j in &groups[b] {
                        sum += distance(i, j);
                        count += 1;
                    }
                }
                let avg = sum / count as f64;
                if avg < best_distance {
                    best_distance = avg;
                    best = (a, b);
                }
            }
        }
        if best_distance > CLUSTER_DISTANCE_THRESHOLD {
            break;
        }
        let merged = groups.remove(best.1);
        groups[best.0].extend(merged);
    }

    let mut clusters: Vec<Cluster> = Vec::new();
    for members in groups.iter_mut() {
        members.sort_unstable();
    }
    for members in groups.iter().filter(|m| m.len() > 1) {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (a, &i) in members.iter().enumerate() {
            for &j in &members[a + 1..] {
                sum += matrix.values[i][j].abs();
                count += 1;
            }
        }
        clusters.push(Cluster {
            cluster_id: 0,
            variables: members
                .iter()
                .map(|&i| matrix.variables[i].clone())
                .collect(),
            size: members.len(),
            avg_correlation: sum / count as f64,
        });
    }

    // Stable sort, then ids follow the final order
    clusters.sort_by(|a, b| b.size.cmp(&a.size));
    for (index, cluster) in clusters.iter_mut().enumerate() {
        cluster.cluster_id = index + 1;
    }
    clusters
}
