use super::weights::WeightTable;

/// Maximum distance of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Validate a weight table.
/// Returns all validation errors at once (not just the first).
pub fn validate_weights(weights: &WeightTable) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (criterion, weight) in weights.iter() {
        if !weight.is_finite() {
            errors.push(format!("weights.{}: must be a finite number", criterion));
        } else if weight < 0.0 {
            errors.push(format!(
                "weights.{}: must be non-negative, got {}",
                criterion, weight
            ));
        }
    }

    let sum = weights.sum();
    if sum.is_finite() && (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!("weights: must sum to 1.0, got {}", sum));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
