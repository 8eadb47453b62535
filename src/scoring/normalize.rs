use super::criteria::{Criterion, CriterionScores, CRITERIA_COUNT};
use crate::dataset::{Rating, VendorRecord};

/// Observed min and max of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    /// Range over `values`, or None when there are none
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, v| {
            Some(match range {
                None => ColumnRange { min: v, max: v },
                Some(r) => ColumnRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            })
        })
    }

    /// Inverted min-max score: the column minimum scores 1, the maximum 0.
    ///
    /// A constant column (max == min) scores 1 for every row. Ranges wider
    /// than `f64::MAX` are measured on halved values so the ratio stays finite.
    pub fn inverted_score(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 1.0;
        }
        let position = if span.is_finite() {
            (value - self.min) / span
        } else {
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        (1.0 - position).clamp(0.0, 1.0)
    }
}

/// Rescale a 1-10 rating to [0,1].
///
/// The loader rejects ratings outside [1,10], so no clamping happens here.
pub fn rating_score(value: f64) -> f64 {
    debug_assert!((Rating::MIN..=Rating::MAX).contains(&value));
    (value - Rating::MIN) / (Rating::MAX - Rating::MIN)
}

/// Column statistics needed to score any row of one table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    price: Option<ColumnRange>,
    lead_time: Option<ColumnRange>,
}

impl Normalizer {
    pub fn fit(records: &[VendorRecord]) -> Self {
        Self {
            price: ColumnRange::of(records.iter().map(|r| r.price)),
            lead_time: ColumnRange::of(records.iter().map(|r| r.lead_time_days)),
        }
    }

    pub fn price_range(&self) -> Option<ColumnRange> {
        self.price
    }

    pub fn lead_time_range(&self) -> Option<ColumnRange> {
        self.lead_time
    }

    pub fn score(&self, record: &VendorRecord) -> CriterionScores {
        let mut scores = CriterionScores::new([0.0; CRITERIA_COUNT]);
        for criterion in Criterion::ALL {
            let value = match criterion {
                Criterion::Price => inverted(self.price, record.price),
                Criterion::LeadTime => inverted(self.lead_time, record.lead_time_days),
                Criterion::Compliance => record.compliance.score(),
                Criterion::FiscalStatus => record.fiscal_status.score(),
                Criterion::Blacklist => record.blacklist.score(),
                Criterion::Rating(r) => rating_score(record.rating(r)),
            };
            scores.set(criterion, value);
        }
        scores
    }
}

// A record scored against a table it was not fitted on is its own range
fn inverted(range: Option<ColumnRange>, value: f64) -> f64 {
    range.map_or(1.0, |r| r.inverted_score(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::vendor;
    use crate::dataset::{Blacklist, Compliance, FiscalStatus};
    use approx::assert_relative_eq;

    #[test]
    fn test_range_of_empty_is_none() {
        assert_eq!(ColumnRange::of(Vec::new()), None);
    }

    #[test]
    fn test_range_of_values() {
        let range = ColumnRange::of(vec![3.0, -1.0, 8.0]).unwrap();
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 8.0);
    }

    #[test]
    fn test_inverted_score_endpoints() {
        let range = ColumnRange { min: 100.0, max: 200.0 };
        assert_eq!(range.inverted_score(100.0), 1.0);
        assert_eq!(range.inverted_score(200.0), 0.0);
        assert_relative_eq!(range.inverted_score(125.0), 0.75);
    }

    #[test]
    fn test_constant_column_scores_one() {
        let range = ColumnRange { min: 50.0, max: 50.0 };
        let score = range.inverted_score(50.0);
        assert!(!score.is_nan());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_inverted_score_span_beyond_f64_max() {
        let range = ColumnRange { min: -1e308, max: 1e308 };
        assert_eq!(range.inverted_score(-1e308), 1.0);
        assert_eq!(range.inverted_score(1e308), 0.0);
        assert_relative_eq!(range.inverted_score(0.0), 0.5);
    }

    #[test]
    fn test_normalizer_extreme_prices() {
        let records = vec![
            vendor("A", -1e308, 1.0),
            vendor("B", 1e308, 1.0),
            vendor("C", 0.0, 1.0),
        ];
        let normalizer = Normalizer::fit(&records);
        let prices: Vec<f64> = records
            .iter()
            .map(|r| normalizer.score(r).get(Criterion::Price))
            .collect();
        assert_eq!(prices[0], 1.0);
        assert_eq!(prices[1], 0.0);
        assert_relative_eq!(prices[2], 0.5);
    }

    #[test]
    fn test_rating_score_endpoints() {
        assert_eq!(rating_score(1.0), 0.0);
        assert_eq!(rating_score(10.0), 1.0);
        assert_relative_eq!(rating_score(5.5), 0.5);
    }

    #[test]
    fn test_normalizer_constant_price_column() {
        let records = vec![vendor("A", 300.0, 4.0), vendor("B", 300.0, 9.0)];
        let normalizer = Normalizer::fit(&records);
        for record in &records {
            assert_eq!(normalizer.score(record).get(Criterion::Price), 1.0);
        }
        assert_eq!(normalizer.score(&records[0]).get(Criterion::LeadTime), 1.0);
        assert_eq!(normalizer.score(&records[1]).get(Criterion::LeadTime), 0.0);
    }

    #[test]
    fn test_normalizer_single_row() {
        let records = vec![vendor("Solo", 999.0, 30.0)];
        let scores = Normalizer::fit(&records).score(&records[0]);
        assert_eq!(scores.get(Criterion::Price), 1.0);
        assert_eq!(scores.get(Criterion::LeadTime), 1.0);
    }

    #[test]
    fn test_normalizer_categoricals() {
        let mut record = vendor("A", 1.0, 1.0);
        record.compliance = Compliance::NonCompliant;
        record.fiscal_status = FiscalStatus::Current;
        record.blacklist = Blacklist::Listed;
        let scores = Normalizer::fit(std::slice::from_ref(&record)).score(&record);
        assert_eq!(scores.get(Criterion::Compliance), 0.0);
        assert_eq!(scores.get(Criterion::FiscalStatus), 1.0);
        assert_eq!(scores.get(Criterion::Blacklist), 0.0);
    }

    #[test]
    fn test_normalizer_ratings() {
        let mut record = vendor("A", 1.0, 1.0);
        record.ratings = [1.0, 10.0, 5.5, 1.0, 10.0, 5.5];
        let scores = Normalizer::fit(std::slice::from_ref(&record)).score(&record);
        assert_eq!(scores.get(Criterion::Rating(Rating::ServiceQuality)), 0.0);
        assert_eq!(scores.get(Criterion::Rating(Rating::Responsiveness)), 1.0);
        assert_relative_eq!(scores.get(Criterion::Rating(Rating::PriorExperience)), 0.5);
    }
}
