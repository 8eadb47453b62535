use std::fmt;

use crate::dataset::{schema, Rating, VendorRecord};

pub const CRITERIA_COUNT: usize = 11;

/// One of the eleven scored criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Price,
    LeadTime,
    Compliance,
    FiscalStatus,
    Blacklist,
    Rating(Rating),
}

impl Criterion {
    /// All criteria in export column order
    pub const ALL: [Criterion; CRITERIA_COUNT] = [
        Criterion::Price,
        Criterion::LeadTime,
        Criterion::Compliance,
        Criterion::FiscalStatus,
        Criterion::Blacklist,
        Criterion::Rating(Rating::ServiceQuality),
        Criterion::Rating(Rating::Responsiveness),
        Criterion::Rating(Rating::PriorExperience),
        Criterion::Rating(Rating::AddedValue),
        Criterion::Rating(Rating::Sustainability),
        Criterion::Rating(Rating::ExternalReputation),
    ];

    /// Criteria with a numeric raw column, charted top/bottom
    pub const VISUALIZED: [Criterion; 8] = [
        Criterion::Price,
        Criterion::LeadTime,
        Criterion::Rating(Rating::ServiceQuality),
        Criterion::Rating(Rating::Responsiveness),
        Criterion::Rating(Rating::PriorExperience),
        Criterion::Rating(Rating::AddedValue),
        Criterion::Rating(Rating::Sustainability),
        Criterion::Rating(Rating::ExternalReputation),
    ];

    pub fn index(self) -> usize {
        match self {
            Criterion::Price => 0,
            Criterion::LeadTime => 1,
            Criterion::Compliance => 2,
            Criterion::FiscalStatus => 3,
            Criterion::Blacklist => 4,
            Criterion::Rating(r) => 5 + r.index(),
        }
    }

    /// Input column the criterion is derived from
    pub fn column(self) -> &'static str {
        match self {
            Criterion::Price => schema::PRICE,
            Criterion::LeadTime => schema::LEAD_TIME,
            Criterion::Compliance => schema::COMPLIANCE,
            Criterion::FiscalStatus => schema::FISCAL_STATUS,
            Criterion::Blacklist => schema::BLACKLIST,
            Criterion::Rating(r) => r.column(),
        }
    }

    /// Name of the derived column in the exported table
    pub fn score_column(self) -> &'static str {
        match self {
            Criterion::Price => "Precio_score",
            Criterion::LeadTime => "Tiempo_score",
            Criterion::Compliance => "Normativa_score",
            Criterion::FiscalStatus => "Fiscal_score",
            Criterion::Blacklist => "Lista_negra_score",
            Criterion::Rating(Rating::ServiceQuality) => "Calidad del servicio_score",
            Criterion::Rating(Rating::Responsiveness) => "Capacidad de respuesta_score",
            Criterion::Rating(Rating::PriorExperience) => "Experiencia previa_score",
            Criterion::Rating(Rating::AddedValue) => "Valor agregado_score",
            Criterion::Rating(Rating::Sustainability) => "Sostenibilidad_score",
            Criterion::Rating(Rating::ExternalReputation) => "Reputación externa_score",
        }
    }

    /// Raw numeric value for criteria backed by a number column
    pub fn raw_value(self, record: &VendorRecord) -> Option<f64> {
        match self {
            Criterion::Price => Some(record.price),
            Criterion::LeadTime => Some(record.lead_time_days),
            Criterion::Rating(r) => Some(record.rating(r)),
            Criterion::Compliance | Criterion::FiscalStatus | Criterion::Blacklist => None,
        }
    }

    /// Look up a criterion by its input column or score column name (case and accents ignored)
    pub fn from_name(name: &str) -> Option<Self> {
        let key = crate::dataset::fold(name);
        Self::ALL.into_iter().find(|c| {
            crate::dataset::fold(c.column()) == key || crate::dataset::fold(c.score_column()) == key
        })
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// The eleven per-criterion scores of one vendor, each in [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionScores([f64; CRITERIA_COUNT]);

impl CriterionScores {
    pub fn new(values: [f64; CRITERIA_COUNT]) -> Self {
        Self(values)
    }

    /// Every criterion set to the same score
    pub fn uniform(value: f64) -> Self {
        Self([value; CRITERIA_COUNT])
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0[criterion.index()]
    }

    pub fn set(&mut self, criterion: Criterion, value: f64) {
        self.0[criterion.index()] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_indices_are_dense_and_ordered() {
        for (expected, criterion) in Criterion::ALL.iter().enumerate() {
            assert_eq!(criterion.index(), expected);
        }
    }

    #[test]
    fn test_score_columns_are_unique() {
        let names: HashSet<_> = Criterion::ALL.iter().map(|c| c.score_column()).collect();
        assert_eq!(names.len(), CRITERIA_COUNT);
    }

    #[test]
    fn test_visualized_have_raw_values() {
        let record = crate::dataset::fixtures::vendor("A", 120.0, 7.0);
        for criterion in Criterion::VISUALIZED {
            assert!(criterion.raw_value(&record).is_some(), "{}", criterion);
        }
        assert_eq!(Criterion::Price.raw_value(&record), Some(120.0));
        assert_eq!(Criterion::Blacklist.raw_value(&record), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Criterion::from_name("precio"), Some(Criterion::Price));
        assert_eq!(
            Criterion::from_name("reputacion externa"),
            Some(Criterion::Rating(Rating::ExternalReputation))
        );
        assert_eq!(Criterion::from_name("Tiempo_score"), Some(Criterion::LeadTime));
        assert_eq!(Criterion::from_name("color"), None);
    }

    #[test]
    fn test_scores_get_set() {
        let mut scores = CriterionScores::uniform(0.5);
        scores.set(Criterion::Blacklist, 0.0);
        assert_eq!(scores.get(Criterion::Blacklist), 0.0);
        assert_eq!(scores.get(Criterion::Price), 0.5);
        assert_eq!(scores.iter().count(), CRITERIA_COUNT);
    }
}
