//! Deterministic k-means over unit-normalized embedding vectors (spec
//! §4.9). Euclidean distance on unit vectors is a monotone transform of
//! cosine distance, so this sorts identically to a cosine-based k-means
//! without needing a second distance function.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sensor_core::constants::{KMEANS_CONVERGENCE_EPSILON, KMEANS_MAX_ITERATIONS, KMEANS_SEED};

/// Raw k-means output before the minimum-cluster-size filter and keyword
/// summary are applied.
pub struct RawCluster {
    pub centroid: Vec<f32>,
    pub members: Vec<usize>,
}

/// Runs k-means to convergence (or `KMEANS_MAX_ITERATIONS`) over `vectors`.
///
/// Initialization uses k-means++ weighted sampling from a fixed-seed
/// `ChaCha8Rng`, so the same input always produces the same initial
/// centroids and therefore the same final assignment (spec §4.9: "fixed
/// seed (deterministic across runs)").
pub fn kmeans(vectors: &[Vec<f32>], k: usize) -> Vec<RawCluster> {
    if vectors.is_empty() || k == 0 {
        return Vec::new();
    }
    let k = k.min(vectors.len());
    let mut rng = ChaCha8Rng::seed_from_u64(KMEANS_SEED);

    let mut centroids = init_plus_plus(vectors, k, &mut rng);
    let mut assignments = vec![0usize; vectors.len()];

    for _ in 0..KMEANS_MAX_ITERATIONS {
        let mut changed_any = false;
        for (i, v) in vectors.iter().enumerate() {
            let nearest = nearest_centroid(v, &centroids);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed_any = true;
            }
        }

        let new_centroids = update_centroids(vectors, &assignments, &centroids);
        let shift = max_centroid_shift(&centroids, &new_centroids);
        centroids = new_centroids;

        if !changed_any && shift < KMEANS_CONVERGENCE_EPSILON {
            break;
        }
        if shift < KMEANS_CONVERGENCE_EPSILON {
            break;
        }
    }

    let mut clusters: Vec<RawCluster> = centroids
        .into_iter()
        .map(|centroid| RawCluster {
            centroid,
            members: Vec::new(),
        })
        .collect();
    for (i, &cluster_idx) in assignments.iter().enumerate() {
        clusters[cluster_idx].members.push(i);
    }

    clusters
}

fn init_plus_plus(vectors: &[Vec<f32>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f32>> {
    let mut centroids = Vec::with_capacity(k);
    let first = rng.gen_range(0..vectors.len());
    centroids.push(vectors[first].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = vectors
            .iter()
            .map(|v| {
                centroids
                    .iter()
                    .map(|c| squared_distance(v, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            let idx = rng.gen_range(0..vectors.len());
            centroids.push(vectors[idx].clone());
            continue;
        }
        let mut target = rng.gen_range(0.0..total);
        let mut chosen = vectors.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                chosen = i;
                break;
            }
            target -= w;
        }
        centroids.push(vectors[chosen].clone());
    }

    centroids
}

fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}

fn nearest_centroid(v: &[f32], centroids: &[Vec<f32>]) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            squared_distance(v, a)
                .partial_cmp(&squared_distance(v, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn update_centroids(vectors: &[Vec<f32>], assignments: &[usize], previous: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let dims = previous[0].len();
    let mut sums = vec![vec![0.0f64; dims]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (v, &cluster_idx) in vectors.iter().zip(assignments) {
        counts[cluster_idx] += 1;
        for (s, x) in sums[cluster_idx].iter_mut().zip(v) {
            *s += *x as f64;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (sum, count))| {
            if count == 0 {
                previous[i].clone()
            } else {
                sum.into_iter().map(|s| (s / count as f64) as f32).collect()
            }
        })
        .collect()
}

fn max_centroid_shift(previous: &[Vec<f32>], current: &[Vec<f32>]) -> f64 {
    previous
        .iter()
        .zip(current)
        .map(|(a, b)| squared_distance(a, b).sqrt())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_two_obvious_clusters() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.95, 0.05],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![0.05, 0.95],
        ];
        let clusters = kmeans(&vectors, 2);
        assert_eq!(clusters.len(), 2);
        let sizes: Vec<usize> = clusters.iter().map(|c| c.members.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 6);
    }

    #[test]
    fn deterministic_across_runs() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
        ];
        let a = kmeans(&vectors, 2);
        let b = kmeans(&vectors, 2);
        let sizes_a: Vec<usize> = a.iter().map(|c| c.members.len()).collect();
        let sizes_b: Vec<usize> = b.iter().map(|c| c.members.len()).collect();
        assert_eq!(sizes_a, sizes_b);
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        assert!(kmeans(&[], 3).is_empty());
    }

    #[test]
    fn k_larger_than_input_is_clamped() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let clusters = kmeans(&vectors, 10);
        assert!(clusters.len() <= 2);
    }
}
