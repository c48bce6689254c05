use hypecycle_common::config::AnalysisConfig;
use hypecycle_common::types::Phase;

use super::loader::{ConfigError, EngineConfig};

/// Upper bound on `analysis.recent_window_years`.
const MAX_RECENT_WINDOW_YEARS: u32 = 1000;

/// Validate the complete engine configuration.
///
/// Checks sane ranges on numeric parameters and that the weight table and
/// tie-break order cover every phase. The binary refuses to start on
/// validation failure.
pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    let mut errors = analysis_errors(&config.system.analysis);

    if config.system.concurrency.worker_pool_size == 0 {
        errors.push("concurrency.worker_pool_size must be > 0".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.join("; ")))
    }
}

/// Every problem with an analysis configuration. Empty means valid.
///
/// Shared by the file loader and by `analyze`, which rejects configurations
/// built in code the same way.
pub fn analysis_errors(config: &AnalysisConfig) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    validate_windows(config, &mut errors);
    validate_keywords(config, &mut errors);
    validate_weights(config, &mut errors);
    validate_tie_break(config, &mut errors);

    errors
}

fn validate_windows(config: &AnalysisConfig, errors: &mut Vec<String>) {
    if config.min_records == 0 {
        errors.push("analysis.min_records must be > 0".into());
    }
    if config.recent_window_years == 0 || config.recent_window_years > MAX_RECENT_WINDOW_YEARS {
        errors.push(format!(
            "analysis.recent_window_years must be in [1, {}]",
            MAX_RECENT_WINDOW_YEARS
        ));
    }
    if !(0.0..1.0).contains(&config.velocity_trend_threshold) {
        errors.push("analysis.velocity_trend_threshold must be in [0.0, 1.0)".into());
    }
    if !config.citation_growth_cap.is_finite() || config.citation_growth_cap <= 0.0 {
        errors.push("analysis.citation_growth_cap must be finite and > 0".into());
    }
    if !config.research_trend_threshold.is_finite() || config.research_trend_threshold < 0.0 {
        errors.push("analysis.research_trend_threshold must be finite and >= 0".into());
    }
}

fn validate_keywords(config: &AnalysisConfig, errors: &mut Vec<String>) {
    if config.classify_research_type {
        if config.basic_keywords.iter().all(|k| k.trim().is_empty()) {
            errors.push(
                "analysis.basic_keywords must not be empty when classify_research_type is set"
                    .into(),
            );
        }
        if config.applied_keywords.iter().all(|k| k.trim().is_empty()) {
            errors.push(
                "analysis.applied_keywords must not be empty when classify_research_type is set"
                    .into(),
            );
        }
    }
    if config.min_token_length == 0 {
        errors.push("analysis.min_token_length must be > 0".into());
    }
    if !config.emerging_keyword_ratio.is_finite() || config.emerging_keyword_ratio < 1.0 {
        errors.push("analysis.emerging_keyword_ratio must be >= 1.0".into());
    }
    if config.emerging_keyword_min_count == 0 {
        errors.push("analysis.emerging_keyword_min_count must be > 0".into());
    }
}

fn validate_weights(config: &AnalysisConfig, errors: &mut Vec<String>) {
    for phase in Phase::ALL {
        let Some(rules) = config.phase_rule_weights.rules_for(phase) else {
            errors.push(format!("analysis.phase_rule_weights.{} is missing", phase));
            continue;
        };

        let mut total = 0.0;
        for (rule, weight) in rules {
            if !weight.is_finite() || *weight < 0.0 {
                errors.push(format!(
                    "analysis.phase_rule_weights.{}.{} must be finite and >= 0",
                    phase, rule
                ));
            } else {
                total += weight;
            }
        }

        if total <= 0.0 {
            errors.push(format!(
                "analysis.phase_rule_weights.{} must have a positive weight total",
                phase
            ));
        }
    }
}

fn validate_tie_break(config: &AnalysisConfig, errors: &mut Vec<String>) {
    let order = &config.tie_break_order;
    let covers_all = Phase::ALL.iter().all(|p| order.contains(p));

    if order.len() != Phase::ALL.len() || !covers_all {
        errors.push("analysis.tie_break_order must list each of the five phases exactly once".into());
    }
}
