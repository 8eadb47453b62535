use serde::{Deserialize, Serialize};

use super::criteria::Criterion;
use crate::dataset::Rating;

/// Weight of each criterion in the composite score.
///
/// One field per criterion, so a criterion without a weight cannot be
/// represented. `WeightTable::default()` holds the fixed weights used by the
/// CLI; other tables are only built in code (tests, embedding callers).
///
/// YAML form:
/// ```yaml
/// price: 0.20
/// lead_time: 0.10
/// compliance: 0.10
/// fiscal_status: 0.05
/// blacklist: 0.05
/// service_quality: 0.10
/// responsiveness: 0.10
/// prior_experience: 0.10
/// added_value: 0.05
/// sustainability: 0.05
/// external_reputation: 0.10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightTable {
    pub price: f64,
    pub lead_time: f64,
    pub compliance: f64,
    pub fiscal_status: f64,
    pub blacklist: f64,
    pub service_quality: f64,
    pub responsiveness: f64,
    pub prior_experience: f64,
    pub added_value: f64,
    pub sustainability: f64,
    pub external_reputation: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            price: 0.20,
            lead_time: 0.10,
            compliance: 0.10,
            fiscal_status: 0.05,
            blacklist: 0.05,
            service_quality: 0.10,
            responsiveness: 0.10,
            prior_experience: 0.10,
            added_value: 0.05,
            sustainability: 0.05,
            external_reputation: 0.10,
        }
    }
}

impl WeightTable {
    /// Same weight for every criterion
    pub fn uniform() -> Self {
        let w = 1.0 / Criterion::ALL.len() as f64;
        Self {
            price: w,
            lead_time: w,
            compliance: w,
            fiscal_status: w,
            blacklist: w,
            service_quality: w,
            responsiveness: w,
            prior_experience: w,
            added_value: w,
            sustainability: w,
            external_reputation: w,
        }
    }

    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Price => self.price,
            Criterion::LeadTime => self.lead_time,
            Criterion::Compliance => self.compliance,
            Criterion::FiscalStatus => self.fiscal_status,
            Criterion::Blacklist => self.blacklist,
            Criterion::Rating(Rating::ServiceQuality) => self.service_quality,
            Criterion::Rating(Rating::Responsiveness) => self.responsiveness,
            Criterion::Rating(Rating::PriorExperience) => self.prior_experience,
            Criterion::Rating(Rating::AddedValue) => self.added_value,
            Criterion::Rating(Rating::Sustainability) => self.sustainability,
            Criterion::Rating(Rating::ExternalReputation) => self.external_reputation,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL.iter().map(move |&c| (c, self.weight(c)))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert_abs_diff_eq!(WeightTable::default().sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_weights_sum_to_one() {
        assert_abs_diff_eq!(WeightTable::uniform().sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_weight_lookup() {
        let weights = WeightTable::default();
        assert_eq!(weights.weight(Criterion::Price), 0.20);
        assert_eq!(weights.weight(Criterion::FiscalStatus), 0.05);
        assert_eq!(
            weights.weight(Criterion::Rating(Rating::ExternalReputation)),
            0.10
        );
    }

    #[test]
    fn test_every_criterion_has_a_weight() {
        let weights = WeightTable::default();
        assert_eq!(weights.iter().count(), Criterion::ALL.len());
        assert!(weights.iter().all(|(_, w)| w > 0.0));
    }

    #[test]
    fn test_weight_table_serde_roundtrip() {
        let weights = WeightTable::default();
        let yaml = serde_saphyr::to_string(&weights).unwrap();
        let parsed: WeightTable = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(weights, parsed);
    }

    #[test]
    fn test_weight_table_rejects_unknown_fields() {
        let yaml = r#"
price: 0.2
lead_time: 0.1
compliance: 0.1
fiscal_status: 0.05
blacklist: 0.05
service_quality: 0.1
responsiveness: 0.1
prior_experience: 0.1
added_value: 0.05
sustainability: 0.05
external_reputation: 0.1
color: 0.0
"#;
        assert!(serde_saphyr::from_str::<WeightTable>(yaml).is_err());
    }
}
