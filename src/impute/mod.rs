//! Estimates the missing "Valor percibido" label from the derived criterion scores.

pub mod forest;
pub mod tree;

use std::fmt;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::scoring::ScoredVendor;
pub use forest::{ForestParams, RandomForest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImputationParams {
    pub enabled: bool,
    pub trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_leaf: usize,
    pub max_features: Option<usize>,
    /// Share of labeled rows held out for validation, in [0,1)
    pub validation_ratio: f64,
    /// Imputation runs only with strictly more labeled rows than this
    pub min_labeled_rows: usize,
    pub seed: u64,
}

impl Default for ImputationParams {
    fn default() -> Self {
        Self {
            enabled: true,
            trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            max_features: None,
            validation_ratio: 0.2,
            min_labeled_rows: 5,
            seed: 42,
        }
    }
}

impl ImputationParams {
    pub fn forest(&self) -> ForestParams {
        ForestParams {
            trees: self.trees,
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    LabelColumnAbsent,
    InsufficientLabels { found: usize, required: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "imputation disabled"),
            SkipReason::LabelColumnAbsent => {
                write!(f, "column '{}' not present", crate::dataset::schema::PERCEIVED_VALUE)
            }
            SkipReason::InsufficientLabels { found, required } => write!(
                f,
                "only {} labeled row(s), at least {} needed",
                found, required
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Index into `Dataset::records`
    pub row: usize,
    pub value: f64,
}

/// Error of the model on the held-out labeled rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub rows: usize,
    pub mae: f64,
    pub rmse: f64,
    /// None with fewer than two rows or a constant target
    pub r2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Imputation {
    pub predictions: Vec<Prediction>,
    pub train_rows: usize,
    /// None when the validation ratio leaves no held-out rows
    pub validation: Option<ValidationReport>,
}

impl Imputation {
    pub fn prediction_for(&self, row: usize) -> Option<f64> {
        self.predictions
            .iter()
            .find(|p| p.row == row)
            .map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImputationOutcome {
    Skipped(SkipReason),
    NothingToImpute { labeled: usize },
    Imputed(Imputation),
}

impl ImputationOutcome {
    pub fn imputation(&self) -> Option<&Imputation> {
        match self {
            ImputationOutcome::Imputed(imputation) => Some(imputation),
            _ => None,
        }
    }

    /// Estimated label for a row, if one was predicted.
    pub fn estimate(&self, row: usize) -> Option<f64> {
        self.imputation().and_then(|i| i.prediction_for(row))
    }

    pub fn ran(&self) -> bool {
        matches!(self, ImputationOutcome::Imputed(_))
    }
}

/// Number of labeled rows held out for validation.
///
/// `ceil(n * ratio)`, leaving at least one training row.
pub fn validation_size(labeled: usize, ratio: f64) -> usize {
    if labeled == 0 {
        return 0;
    }
    let held_out = (labeled as f64 * ratio.clamp(0.0, 1.0)).ceil() as usize;
    held_out.min(labeled - 1)
}

/// Fit a forest on the labeled rows and predict every unlabeled one.
///
/// `scored` must be the output of `score_vendors` for `dataset.records`.
pub fn impute(
    dataset: &Dataset,
    scored: &[ScoredVendor],
    params: &ImputationParams,
) -> Result<ImputationOutcome> {
    if !params.enabled {
        return Ok(ImputationOutcome::Skipped(SkipReason::Disabled));
    }
    if !dataset.has_label_column {
        tracing::info!("no label column, skipping imputation");
        return Ok(ImputationOutcome::Skipped(SkipReason::LabelColumnAbsent));
    }

    let mut labeled = Vec::new();
    let mut unlabeled = Vec::new();
    for vendor in scored {
        match dataset.records.get(vendor.row).and_then(|r| r.perceived_value) {
            Some(value) => labeled.push((vendor, value)),
            None => unlabeled.push(vendor),
        }
    }

    if labeled.len() <= params.min_labeled_rows {
        let reason = SkipReason::InsufficientLabels {
            found: labeled.len(),
            required: params.min_labeled_rows + 1,
        };
        tracing::warn!("skipping imputation: {}", reason);
        return Ok(ImputationOutcome::Skipped(reason));
    }
    if unlabeled.is_empty() {
        tracing::info!(labeled = labeled.len(), "every row is labeled, nothing to impute");
        return Ok(ImputationOutcome::NothingToImpute {
            labeled: labeled.len(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    labeled.shuffle(&mut rng);
    let held_out = validation_size(labeled.len(), params.validation_ratio);
    let (validation_rows, train_rows) = labeled.split_at(held_out);

    let x_train: Vec<Vec<f64>> = train_rows
        .iter()
        .map(|(v, _)| v.scores.as_slice().to_vec())
        .collect();
    let y_train: Vec<f64> = train_rows.iter().map(|(_, y)| *y).collect();
    let forest = RandomForest::fit(&x_train, &y_train, &params.forest())
        .context("Failed to train the imputation model")?;

    let validation = (!validation_rows.is_empty()).then(|| {
        let pairs: Vec<(f64, f64)> = validation_rows
            .iter()
            .map(|(v, y)| (*y, forest.predict(v.scores.as_slice())))
            .collect();
        validation_report(&pairs)
    });

    let predictions: Vec<Prediction> = unlabeled
        .iter()
        .map(|v| Prediction {
            row: v.row,
            value: forest.predict(v.scores.as_slice()),
        })
        .collect();

    if let Some(report) = &validation {
        tracing::info!(
            train = train_rows.len(),
            validation = report.rows,
            mae = report.mae,
            rmse = report.rmse,
            "imputation model trained"
        );
    }
    tracing::info!(count = predictions.len(), "imputed perceived value");

    Ok(ImputationOutcome::Imputed(Imputation {
        predictions,
        train_rows: train_rows.len(),
        validation,
    }))
}

/// MAE, RMSE and R² over (actual, predicted) pairs. `pairs` must be non-empty.
fn validation_report(pairs: &[(f64, f64)]) -> ValidationReport {
    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(y, p)| (y - p).abs()).sum::<f64>() / n;
    let ss_res: f64 = pairs.iter().map(|(y, p)| (y - p).powi(2)).sum();
    let rmse = (ss_res / n).sqrt();

    let mean = pairs.iter().map(|(y, _)| y).sum::<f64>() / n;
    let ss_tot: f64 = pairs.iter().map(|(y, _)| (y - mean).powi(2)).sum();
    let r2 = (pairs.len() >= 2 && ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot);

    ValidationReport {
        rows: pairs.len(),
        mae,
        rmse,
        r2,
    }
}
