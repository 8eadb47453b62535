use super::criteria::{Criterion, CriterionScores};
use super::normalize::Normalizer;
use super::weights::WeightTable;
use crate::dataset::VendorRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub criterion: Criterion,
    pub score: f64,        // Normalized score in [0,1]
    pub weight: f64,       // Weight applied to the score
    pub contribution: f64, // score * weight
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub contributions: Vec<Contribution>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.contributions.iter().map(|c| c.contribution).sum()
    }
}

/// A vendor with its derived scores. `row` indexes `Dataset::records`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredVendor {
    pub row: usize,
    pub scores: CriterionScores,
    pub total: f64,
}

/// Weighted sum of the eleven criterion scores.
pub fn aggregate(scores: &CriterionScores, weights: &WeightTable) -> f64 {
    let total: f64 = weights
        .iter()
        .map(|(criterion, weight)| scores.get(criterion) * weight)
        .sum();
    // Absorbs rounding from the weighted sum when every score is 0 or 1
    total.clamp(0.0, 1.0)
}

pub fn breakdown(scores: &CriterionScores, weights: &WeightTable) -> ScoreBreakdown {
    let contributions = weights
        .iter()
        .map(|(criterion, weight)| {
            let score = scores.get(criterion);
            Contribution {
                criterion,
                score,
                weight,
                contribution: score * weight,
            }
        })
        .collect();
    ScoreBreakdown { contributions }
}

/// Score every record against the column statistics of the whole table.
pub fn score_vendors(records: &[VendorRecord], weights: &WeightTable) -> Vec<ScoredVendor> {
    let normalizer = Normalizer::fit(records);
    if let (Some(price), Some(lead)) = (normalizer.price_range(), normalizer.lead_time_range()) {
        tracing::debug!(
            price_min = price.min,
            price_max = price.max,
            lead_min = lead.min,
            lead_max = lead.max,
            "fitted column ranges"
        );
    }

    records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let scores = normalizer.score(record);
            ScoredVendor {
                row,
                total: aggregate(&scores, weights),
                scores,
            }
        })
        .collect()
}
