//! Seeded k-means over raw (lat, lng) pairs
//!
//! Centroids are initialized with k-means++ from a `StdRng` seeded with a
//! fixed value, so identical input always produces identical labels.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

type Point = [f64; 2];

/// Centroid-based partitioning parameters
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    pub k: usize,
    pub seed: u64,
    pub max_iterations: usize,
}

fn squared_distance(a: &Point, b: &Point) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest(point: &Point, centers: &[Point]) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (j, center) in centers.iter().enumerate() {
        let dist = squared_distance(point, center);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = j;
        }
    }
    best_cluster
}

impl KMeans {
    #[must_use]
    pub fn new(k: usize, seed: u64, max_iterations: usize) -> Self {
        Self {
            k,
            seed,
            max_iterations,
        }
    }

    /// Assign each point a label in `0..k`.
    ///
    /// Returns an empty vector for empty input or `k == 0`. When `k` is at
    /// least the number of points every point gets its own label.
    #[must_use]
    pub fn fit(&self, points: &[Point]) -> Vec<usize> {
        if points.is_empty() || self.k == 0 {
            return vec![];
        }
        if self.k >= points.len() {
            return (0..points.len()).collect();
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centers = self.init_centers(points, &mut rng);
        let mut assignments: Vec<usize> = points.iter().map(|p| nearest(p, &centers)).collect();

        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;

            let mut sums = vec![[0.0, 0.0]; self.k];
            let mut counts = vec![0usize; self.k];
            for (point, &cluster) in points.iter().zip(&assignments) {
                sums[cluster][0] += point[0];
                sums[cluster][1] += point[1];
                counts[cluster] += 1;
            }
            // Empty clusters keep their previous centroid.
            for j in 0..self.k {
                if counts[j] > 0 {
                    let count = counts[j] as f64;
                    centers[j] = [sums[j][0] / count, sums[j][1] / count];
                }
            }

            let mut changed = false;
            for (point, assignment) in points.iter().zip(assignments.iter_mut()) {
                let cluster = nearest(point, &centers);
                if *assignment != cluster {
                    *assignment = cluster;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        debug!(points = points.len(), k = self.k, iterations, "k-means converged");
        assignments
    }

    /// k-means++ seeding: each further center is sampled with probability
    /// proportional to its squared distance from the nearest chosen center.
    fn init_centers(&self, points: &[Point], rng: &mut StdRng) -> Vec<Point> {
        let mut centers: Vec<Point> = Vec::with_capacity(self.k);
        centers.push(points[rng.random_range(0..points.len())]);

        while centers.len() < self.k {
            let weights: Vec<f64> = points
                .iter()
                .map(|p| {
                    centers
                        .iter()
                        .map(|c| squared_distance(p, c))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();
            let total: f64 = weights.iter().sum();

            let next = if total > 0.0 {
                let mut target = rng.random::<f64>() * total;
                let mut chosen = points.len() - 1;
                for (idx, weight) in weights.iter().enumerate() {
                    if *weight > 0.0 && target < *weight {
                        chosen = idx;
                        break;
                    }
                    target -= weight;
                }
                chosen
            } else {
                // Every point coincides with a center already.
                rng.random_range(0..points.len())
            };
            centers.push(points[next]);
        }

        centers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_zero_k() {
        assert!(KMeans::new(3, 42, 100).fit(&[]).is_empty());
        assert!(KMeans::new(0, 42, 100).fit(&[[1.0, 1.0]]).is_empty());
    }

    #[test]
    fn test_k_covers_all_points() {
        let points = [[0.0, 0.0], [5.0, 5.0]];
        assert_eq!(KMeans::new(2, 42, 100).fit(&points), vec![0, 1]);
    }

    #[test]
    fn test_separates_obvious_groups() {
        let points = [
            [26.90, 75.80],
            [28.61, 77.20],
            [26.91, 75.81],
            [28.62, 77.21],
            [26.92, 75.79],
            [28.60, 77.19],
        ];
        let labels = KMeans::new(2, 42, 300).fit(&points);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[0], labels[4]);
        assert_eq!(labels[1], labels[3]);
        assert_eq!(labels[1], labels[5]);
        assert_ne!(labels[0], labels[1]);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let points: Vec<Point> = (0..25)
            .map(|i| [(i * 7 % 11) as f64 * 0.1, (i * 3 % 13) as f64 * 0.1])
            .collect();
        let model = KMeans::new(5, 42, 300);
        let first = model.fit(&points);
        for _ in 0..5 {
            assert_eq!(model.fit(&points), first);
        }
    }

    #[test]
    fn test_identical_points_collapse_to_one_label() {
        let points = [[1.0, 1.0]; 6];
        let labels = KMeans::new(2, 42, 300).fit(&points);
        assert!(labels.iter().all(|l| *l == labels[0]));
    }
}
