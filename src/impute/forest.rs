use anyhow::{bail, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::tree::{RegressionTree, TreeParams};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_leaf: usize,
    /// Features sampled per split; None means ceil(n_features / 3)
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// Bagged ensemble of regression trees. Predictions are the mean over trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit `params.trees` trees, each on a bootstrap resample of the rows.
    ///
    /// Deterministic for a given seed and input order.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: &ForestParams) -> Result<Self> {
        if features.is_empty() {
            bail!("cannot fit a random forest on zero rows");
        }
        if features.len() != targets.len() {
            bail!(
                "feature rows ({}) and targets ({}) differ in length",
                features.len(),
                targets.len()
            );
        }
        let n_features = features[0].len();
        if features.iter().any(|row| row.len() != n_features) {
            bail!("feature rows must all have {} columns", n_features);
        }
        if params.trees == 0 {
            bail!("a random forest needs at least one tree");
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: 2,
            min_samples_leaf: params.min_samples_leaf.max(1),
            max_features: params
                .max_features
                .unwrap_or_else(|| n_features.div_ceil(3))
                .clamp(1, n_features.max(1)),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let n = features.len();
        let trees = (0..params.trees)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(features, targets, &bootstrap, &tree_params, &mut rng)
            })
            .collect();

        Ok(Self { trees, n_features })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.n_features);
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    #[cfg(test)]
    fn tree_count(&self) -> usize {
        self.trees.len()
    }

    #[cfg(test)]
    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                vec![t, 1.0 - t, (t * 7.0).fract()]
            })
            .collect();
        let y = x.iter().map(|r| 10.0 * r[0]).collect();
        (x, y)
    }

    #[test]
    fn test_rejects_empty_training_set() {
        assert!(RandomForest::fit(&[], &[], &ForestParams::default()).is_err());
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let err = RandomForest::fit(&[vec![1.0]], &[1.0, 2.0], &ForestParams::default());
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_zero_trees() {
        let params = ForestParams {
            trees: 0,
            ..ForestParams::default()
        };
        assert!(RandomForest::fit(&[vec![1.0]], &[1.0], &params).is_err());
    }

    #[test]
    fn test_predictions_within_target_range() {
        let (x, y) = linear_data(30);
        let forest = RandomForest::fit(&x, &y, &ForestParams::default()).unwrap();
        assert_eq!(forest.tree_count(), 100);
        assert_eq!(forest.n_features(), 3);
        for p in x.iter().map(|row| forest.predict(row)) {
            assert!((0.0..=10.0).contains(&p));
        }
    }

    #[test]
    fn test_tracks_monotone_signal() {
        let (x, y) = linear_data(40);
        let forest = RandomForest::fit(&x, &y, &ForestParams::default()).unwrap();
        let low = forest.predict(&[0.1, 0.9, 0.7]);
        let high = forest.predict(&[0.9, 0.1, 0.3]);
        assert!(high > low + 3.0, "low={} high={}", low, high);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = linear_data(20);
        let params = ForestParams {
            trees: 25,
            ..ForestParams::default()
        };
        let a = RandomForest::fit(&x, &y, &params).unwrap();
        let b = RandomForest::fit(&x, &y, &params).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.predict(&[0.33, 0.67, 0.31]), b.predict(&[0.33, 0.67, 0.31]));
    }

    #[test]
    fn test_single_row_predicts_its_target() {
        let forest = RandomForest::fit(&[vec![0.2, 0.4]], &[6.5], &ForestParams::default()).unwrap();
        assert_eq!(forest.predict(&[0.9, 0.9]), 6.5);
    }
}
