//! CART regression tree with squared-error splits and per-split feature sampling.

use rand::seq::index;
use rand::Rng;

/// Gains at or below this are treated as no improvement
const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered at each split
    pub max_features: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: usize::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Fit on the rows of `features`/`targets` listed in `samples` (duplicates allowed).
    ///
    /// `samples` must be non-empty and every row of `features` must have the same width.
    pub fn fit<R: Rng + ?Sized>(
        features: &[Vec<f64>],
        targets: &[f64],
        samples: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let mut samples = samples.to_vec();
        tree.grow(features, targets, &mut samples, 0, params, rng);
        tree
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if value <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    #[cfg(test)]
    fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        samples: &mut [usize],
        depth: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> usize {
        let id = self.nodes.len();
        let value = mean(targets, samples);
        self.nodes.push(Node::Leaf { value });

        let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
        let too_small = samples.len() < params.min_samples_split.max(2)
            || samples.len() < 2 * params.min_samples_leaf.max(1);
        if depth_reached || too_small {
            return id;
        }

        let Some(split) = best_split(features, targets, samples, params, rng) else {
            return id;
        };

        samples.sort_by(|&a, &b| features[a][split.feature].total_cmp(&features[b][split.feature]));
        let mid = samples.partition_point(|&s| features[s][split.feature] <= split.threshold);
        let (left_samples, right_samples) = samples.split_at_mut(mid);

        let left = self.grow(features, targets, left_samples, depth + 1, params, rng);
        let right = self.grow(features, targets, right_samples, depth + 1, params, rng);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }
}

fn mean(targets: &[f64], samples: &[usize]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&s| targets[s]).sum::<f64>() / samples.len() as f64
}

/// Best squared-error split over a random subset of features, if any reduces the error.
fn best_split<R: Rng + ?Sized>(
    features: &[Vec<f64>],
    targets: &[f64],
    samples: &mut [usize],
    params: &TreeParams,
    rng: &mut R,
) -> Option<SplitCandidate> {
    let n = samples.len();
    let n_features = features.get(*samples.first()?)?.len();
    if n_features == 0 {
        return None;
    }

    let total_sum: f64 = samples.iter().map(|&s| targets[s]).sum();
    let total_sq: f64 = samples.iter().map(|&s| targets[s] * targets[s]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;
    if parent_sse <= MIN_GAIN {
        return None;
    }

    let min_leaf = params.min_samples_leaf.max(1);
    let amount = params.max_features.clamp(1, n_features);
    let mut best: Option<SplitCandidate> = None;

    for feature in index::sample(rng, n_features, amount).iter() {
        samples.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for pos in 0..n - 1 {
            let y = targets[samples[pos]];
            left_sum += y;
            left_sq += y * y;

            let left_n = pos + 1;
            let right_n = n - left_n;
            if left_n < min_leaf || right_n < min_leaf {
                continue;
            }

            let here = features[samples[pos]][feature];
            let next = features[samples[pos + 1]][feature];
            if next <= here {
                continue; // no threshold separates equal values
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n as f64)
                + (right_sq - right_sum * right_sum / right_n as f64);
            let gain = parent_sse - sse;

            if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                let midpoint = here + (next - here) / 2.0;
                let threshold = if midpoint < next { midpoint } else { here };
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn all(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_single_sample_is_leaf() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tree = RegressionTree::fit(&[vec![0.5]], &[3.0], &[0], &TreeParams::default(), &mut rng);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.predict(&[0.9]), 3.0);
    }

    #[test]
    fn test_constant_target_is_leaf() {
        let x = vec![vec![0.1], vec![0.5], vec![0.9]];
        let y = vec![2.0, 2.0, 2.0];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tree = RegressionTree::fit(&x, &y, &all(3), &TreeParams::default(), &mut rng);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&[0.3]), 2.0);
    }

    #[test]
    fn test_learns_step_function() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 / 10.0]).collect();
        let y: Vec<f64> = (0..10).map(|i| if i < 5 { 1.0 } else { 9.0 }).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = RegressionTree::fit(&x, &y, &all(10), &TreeParams::default(), &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&[0.2]), 1.0);
        assert_eq!(tree.predict(&[0.8]), 9.0);
        // Threshold sits between 0.4 and 0.5
        assert_eq!(tree.predict(&[0.44]), 1.0);
        assert_eq!(tree.predict(&[0.46]), 9.0);
    }

    #[test]
    fn test_picks_informative_feature() {
        // Feature 0 is noise, feature 1 determines the target
        let x = vec![
            vec![0.3, 0.0],
            vec![0.1, 0.1],
            vec![0.9, 0.2],
            vec![0.2, 0.8],
            vec![0.7, 0.9],
            vec![0.5, 1.0],
        ];
        let y = vec![0.0, 0.0, 0.0, 5.0, 5.0, 5.0];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tree = RegressionTree::fit(&x, &y, &all(6), &TreeParams::default(), &mut rng);
        assert_eq!(tree.predict(&[0.9, 0.05]), 0.0);
        assert_eq!(tree.predict(&[0.1, 0.95]), 5.0);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..16).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..16).map(|i| (i * i) as f64).collect();
        let params = TreeParams {
            max_depth: Some(2),
            ..TreeParams::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tree = RegressionTree::fit(&x, &y, &all(16), &params, &mut rng);
        assert_eq!(tree.depth(), 2);
        assert!(tree.leaf_count() <= 4);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let x: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let y = vec![0.0, 0.0, 0.0, 0.0, 0.0, 100.0];
        let params = TreeParams {
            min_samples_leaf: 3,
            ..TreeParams::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tree = RegressionTree::fit(&x, &y, &all(6), &params, &mut rng);
        // The outlier cannot be isolated, so it shares a leaf with two others
        assert_abs_diff_eq!(tree.predict(&[5.0]), 100.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_samples_weight_the_mean() {
        let x = vec![vec![0.0], vec![0.0]];
        let y = vec![1.0, 4.0];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tree = RegressionTree::fit(&x, &y, &[0, 0, 1], &TreeParams::default(), &mut rng);
        assert_abs_diff_eq!(tree.predict(&[0.0]), 2.0, epsilon = 1e-12);
    }
}
