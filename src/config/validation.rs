use super::Config;

/// Check a loaded config, returning every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.input.delimiter_byte().is_none() {
        errors.push(format!(
            "input.delimiter: must be a single ASCII character, got '{}'",
            config.input.delimiter
        ));
    }

    let imputation = &config.imputation;
    if imputation.trees == 0 {
        errors.push("imputation.trees: must be at least 1".to_string());
    }
    if imputation.min_samples_leaf == 0 {
        errors.push("imputation.min_samples_leaf: must be at least 1".to_string());
    }
    if imputation.max_features == Some(0) {
        errors.push("imputation.max_features: must be at least 1 when set".to_string());
    }
    if imputation.max_depth == Some(0) {
        errors.push("imputation.max_depth: must be at least 1 when set".to_string());
    }
    if !(0.0..1.0).contains(&imputation.validation_ratio) {
        errors.push(format!(
            "imputation.validation_ratio: must be in [0, 1), got {}",
            imputation.validation_ratio
        ));
    }

    if config.charts.top_n == 0 {
        errors.push("charts.top_n: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
