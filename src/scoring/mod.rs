pub mod criteria;
pub mod engine;
pub mod normalize;
pub mod rank;
pub mod validation;
pub mod weights;

pub use criteria::{Criterion, CriterionScores, CRITERIA_COUNT};
pub use engine::{aggregate, breakdown, score_vendors, Contribution, ScoreBreakdown, ScoredVendor};
pub use normalize::{rating_score, ColumnRange, Normalizer};
pub use rank::rank_order;
pub use validation::validate_weights;
pub use weights::WeightTable;
