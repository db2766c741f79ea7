use super::config::EngineConfig;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate engine configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_engine(config: &EngineConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref weights) = config.weights {
        for (name, weight) in weights.entries() {
            if !weight.is_finite() || weight < 0.0 {
                errors.push(format!(
                    "engine.weights.{}: must be a non-negative number, got {}",
                    name, weight
                ));
            }
        }

        // Overall score stays on 0-100 only if the weights add up to 1
        let total = weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!("engine.weights: must sum to 1.0, got {:.4}", total));
        }
    }

    if let Some(max) = config.berkus_category_max {
        if !max.is_finite() || max <= 0.0 {
            errors.push("engine.berkus_category_max: must be positive".to_string());
        }
    }

    if let Some(baseline) = config.scorecard_baseline {
        if !baseline.is_finite() || baseline <= 0.0 {
            errors.push("engine.scorecard_baseline: must be positive".to_string());
        }
    }

    if let Some(spread) = config.valuation_spread {
        if !(0.0..1.0).contains(&spread) {
            errors.push(format!(
                "engine.valuation_spread: must be in [0, 1), got {}",
                spread
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
