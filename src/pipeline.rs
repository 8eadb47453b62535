use anyhow::{bail, Result};

use crate::dataset::{Dataset, UnrecognizedValue};
use crate::impute::{impute, ImputationOutcome, ImputationParams};
use crate::report::Summary;
use crate::scoring::{
    breakdown, rank_order, score_vendors, validate_weights, ScoreBreakdown, ScoredVendor,
    WeightTable,
};

/// Everything derived from one input table.
///
/// Built once per invocation by `analyze` and shared by the text output,
/// the interactive viewer and export.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub dataset: Dataset,
    pub weights: WeightTable,
    /// One entry per record, in row order
    pub scored: Vec<ScoredVendor>,
    /// Positions into `scored`, best first
    pub ranking: Vec<usize>,
    pub imputation: ImputationOutcome,
    pub summary: Summary,
    pub unrecognized: Vec<UnrecognizedValue>,
}

/// A ranked vendor with its 1-based rank.
#[derive(Debug, Clone, Copy)]
pub struct RankedVendor<'a> {
    pub rank: usize,
    pub name: &'a str,
    pub vendor: &'a ScoredVendor,
    pub estimate: Option<f64>,
}

impl Analysis {
    /// Vendors in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = RankedVendor<'_>> + '_ {
        self.ranking.iter().enumerate().map(move |(pos, &idx)| {
            let vendor = &self.scored[idx];
            RankedVendor {
                rank: pos + 1,
                name: self.name(vendor.row),
                vendor,
                estimate: self.imputation.estimate(vendor.row),
            }
        })
    }

    pub fn name(&self, row: usize) -> &str {
        self.dataset
            .records
            .get(row)
            .map(|r| r.name.as_str())
            .unwrap_or("")
    }

    pub fn breakdown(&self, row: usize) -> Option<ScoreBreakdown> {
        self.scored
            .get(row)
            .map(|vendor| breakdown(&vendor.scores, &self.weights))
    }
}

/// Score, rank and impute a loaded table.
pub fn analyze(
    dataset: Dataset,
    weights: &WeightTable,
    imputation: &ImputationParams,
) -> Result<Analysis> {
    if let Err(errors) = validate_weights(weights) {
        bail!("invalid weight table:\n  - {}", errors.join("\n  - "));
    }

    let unrecognized = dataset.unrecognized_values();
    if !unrecognized.is_empty() {
        tracing::debug!(
            count = unrecognized.len(),
            "unrecognized categorical values scored as 0"
        );
    }

    let scored = score_vendors(&dataset.records, weights);
    let ranking = rank_order(&scored);
    let outcome = impute(&dataset, &scored, imputation)?;
    let summary = Summary::of(&dataset.records, &scored);

    tracing::info!(vendors = scored.len(), "analysis complete");

    Ok(Analysis {
        dataset,
        weights: weights.clone(),
        scored,
        ranking,
        imputation: outcome,
        summary,
        unrecognized,
    })
}
