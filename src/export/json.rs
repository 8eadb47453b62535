use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::impute::ImputationOutcome;
use crate::pipeline::Analysis;
use crate::report::Summary;
use crate::scoring::WeightTable;

#[derive(Debug, Serialize)]
struct CriterionScore {
    criterion: &'static str,
    score: f64,
    weight: f64,
}

#[derive(Debug, Serialize)]
struct VendorEntry<'a> {
    rank: usize,
    row: usize,
    name: &'a str,
    total: f64,
    scores: Vec<CriterionScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    perceived_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_value: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    summary: &'a Summary,
    weights: &'a WeightTable,
    imputation: &'a ImputationOutcome,
    unrecognized_values: usize,
    /// Rank order
    vendors: Vec<VendorEntry<'a>>,
}

fn report(analysis: &Analysis) -> Report<'_> {
    let vendors = analysis
        .ranked()
        .map(|ranked| VendorEntry {
            rank: ranked.rank,
            row: ranked.vendor.row + 1,
            name: ranked.name,
            total: ranked.vendor.total,
            scores: analysis
                .weights
                .iter()
                .map(|(criterion, weight)| CriterionScore {
                    criterion: criterion.score_column(),
                    score: ranked.vendor.scores.get(criterion),
                    weight,
                })
                .collect(),
            perceived_value: analysis
                .dataset
                .records
                .get(ranked.vendor.row)
                .and_then(|r| r.perceived_value),
            estimated_value: ranked.estimate,
        })
        .collect();

    Report {
        summary: &analysis.summary,
        weights: &analysis.weights,
        imputation: &analysis.imputation,
        unrecognized_values: analysis.unrecognized.len(),
        vendors,
    }
}

pub fn write_json<W: Write>(analysis: &Analysis, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &report(analysis))
        .context("Failed to serialize analysis")?;
    Ok(())
}

pub fn to_json_string(analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(&report(analysis)).context("Failed to serialize analysis")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{dataset, vendor};
    use crate::impute::ImputationParams;
    use crate::pipeline::analyze;

    #[test]
    fn test_json_vendors_in_rank_order() {
        let analysis = analyze(
            dataset(vec![vendor("Caro", 200.0, 5.0), vendor("Barato", 100.0, 5.0)], false),
            &WeightTable::default(),
            &ImputationParams::default(),
        )
        .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&to_json_string(&analysis).unwrap()).unwrap();

        let vendors = value["vendors"].as_array().unwrap();
        assert_eq!(vendors[0]["name"], "Barato");
        assert_eq!(vendors[0]["rank"], 1);
        assert_eq!(vendors[0]["row"], 2);
        assert_eq!(vendors[0]["scores"].as_array().unwrap().len(), 11);
        assert_eq!(value["summary"]["count"], 2);
        assert_eq!(value["imputation"]["status"], "skipped");
        assert_eq!(value["imputation"]["reason"], "label_column_absent");
    }

    #[test]
    fn test_json_empty_table() {
        let analysis = analyze(
            dataset(vec![], false),
            &WeightTable::default(),
            &ImputationParams::default(),
        )
        .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&to_json_string(&analysis).unwrap()).unwrap();
        assert!(value["vendors"].as_array().unwrap().is_empty());
        assert!(value["summary"]["mean_total"].is_null());
    }
}
