//! A minimal isolation forest.
//!
//! Standard construction (Liu, Ting & Zhou 2008): each tree is grown on a
//! random subsample by picking a random feature and a uniform split point
//! until points are isolated or the height limit is reached. Anomalies are
//! points with short average path lengths.
//!
//! `score_samples` follows the common library convention of returning the
//! negated anomaly score, so lower (more negative) means more anomalous.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::index::sample;

/// Subsample size cap per tree.
const MAX_SUBSAMPLE: usize = 256;

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// A fitted isolation forest.
pub struct IsolationForest {
    trees: Vec<Node>,
    subsample: usize,
}

impl IsolationForest {
    /// Fit a forest of `n_trees` trees on the given feature matrix.
    ///
    /// All rows must have the same dimensionality and contain no NaNs; the
    /// scorer guarantees both by excluding records with missing features.
    #[must_use]
    pub fn fit(data: &[Vec<f64>], n_trees: usize, rng: &mut StdRng) -> Self {
        let n = data.len();
        let subsample = n.min(MAX_SUBSAMPLE);
        let height_limit = (subsample.max(2) as f64).log2().ceil() as usize;

        let trees = (0..n_trees)
            .map(|_| {
                let indices: Vec<usize> = sample(rng, n, subsample).into_iter().collect();
                build_tree(data, indices, 0, height_limit, rng)
            })
            .collect();

        Self { trees, subsample }
    }

    /// Negated anomaly scores, one per input row; lower is more anomalous.
    #[must_use]
    pub fn score_samples(&self, data: &[Vec<f64>]) -> Vec<f64> {
        let norm = average_path_length(self.subsample.max(2));
        data.iter()
            .map(|point| {
                let mean_path = self
                    .trees
                    .iter()
                    .map(|tree| path_length(tree, point, 0))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                -f64::powf(2.0, -mean_path / norm)
            })
            .collect()
    }
}

fn build_tree(
    data: &[Vec<f64>],
    indices: Vec<usize>,
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= height_limit || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Features with spread among the rows at this node
    let dims = data[indices[0]].len();
    let splittable: Vec<usize> = (0..dims)
        .filter(|&d| {
            let (min, max) = min_max(data, &indices, d);
            max > min
        })
        .collect();
    if splittable.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let feature = splittable[rng.random_range(0..splittable.len())];
    let (min, max) = min_max(data, &indices, feature);
    let threshold = rng.random_range(min..max);

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| data[i][feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(data, left, depth + 1, height_limit, rng)),
        right: Box::new(build_tree(data, right, depth + 1, height_limit, rng)),
    }
}

fn min_max(data: &[Vec<f64>], indices: &[usize], feature: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &i in indices {
        let v = data[i][feature];
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn path_length(node: &Node, point: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            let child = if point[*feature] < *threshold { left } else { right };
            path_length(child, point, depth + 1)
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points,
/// the c(n) normalizer from the isolation-forest paper.
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    let harmonic = (n - 1.0).ln() + EULER_MASCHERONI;
    2.0 * harmonic - 2.0 * (n - 1.0) / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fixture() -> Vec<Vec<f64>> {
        // Tight cluster around 1.0 with one far outlier
        let mut data: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![1.0 + f64::from(i) * 0.01])
            .collect();
        data.push(vec![500.0]);
        data
    }

    #[test]
    fn test_outlier_scores_lowest() {
        let data = fixture();
        let mut rng = StdRng::seed_from_u64(42);
        let forest = IsolationForest::fit(&data, 100, &mut rng);
        let scores = forest.score_samples(&data);

        assert_eq!(scores.len(), data.len());
        let outlier_score = scores[scores.len() - 1];
        assert!(
            scores[..scores.len() - 1].iter().all(|&s| s > outlier_score),
            "outlier must have the lowest score: {scores:?}"
        );
    }

    #[test]
    fn test_scores_are_negative_and_bounded() {
        let data = fixture();
        let mut rng = StdRng::seed_from_u64(7);
        let forest = IsolationForest::fit(&data, 50, &mut rng);
        for score in forest.score_samples(&data) {
            assert!((-1.0..0.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn test_same_seed_reproduces_scores() {
        let data = fixture();
        let score = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            IsolationForest::fit(&data, 100, &mut rng).score_samples(&data)
        };
        assert_eq!(score(42), score(42));
    }

    #[test]
    fn test_constant_data_scores_uniformly() {
        let data: Vec<Vec<f64>> = (0..10).map(|_| vec![3.0]).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let forest = IsolationForest::fit(&data, 20, &mut rng);
        let scores = forest.score_samples(&data);
        assert!(scores.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-12));
    }
}
