use std::time::Instant;

use hypecycle_common::config::AnalysisConfig;
use hypecycle_common::types::{AnalysisResult, EvidenceRecord};
use hypecycle_common::{HypeCycleError, Result};

use crate::config::validation;
use crate::extract::extract_metrics;
use crate::rationale;
use crate::scoring::score_phases;

/// Run one complete analysis: extract metrics, score every phase, select
/// one, and explain the choice.
///
/// Either a complete, internally consistent result is returned or an error;
/// never a partial result. The configuration is validated on every call, so
/// a hand-built `AnalysisConfig` gets the same checks as a loaded one.
pub fn analyze(records: &[EvidenceRecord], config: &AnalysisConfig) -> Result<AnalysisResult> {
    let start = Instant::now();
    metrics::counter!("analysis.runs").increment(1);

    let outcome = run(records, config);

    metrics::histogram!("analysis.duration_seconds").record(start.elapsed().as_secs_f64());
    match &outcome {
        Ok(result) => {
            metrics::counter!("analysis.records_skipped")
                .increment(result.metrics.skipped_records as u64);
            metrics::counter!(
                "analysis.phase_selected",
                "phase" => result.selected_phase.as_str()
            )
            .increment(1);
            tracing::info!(
                records = records.len(),
                analyzed = result.metrics.analyzed_records,
                phase = result.selected_phase.as_str(),
                confidence = result.confidence,
                "Analysis complete"
            );
        }
        Err(e) => {
            metrics::counter!("analysis.failures", "reason" => e.reason()).increment(1);
            tracing::warn!(records = records.len(), error = %e, "Analysis failed");
        }
    }

    outcome
}

fn run(records: &[EvidenceRecord], config: &AnalysisConfig) -> Result<AnalysisResult> {
    let problems = validation::analysis_errors(config);
    if !problems.is_empty() {
        return Err(HypeCycleError::Configuration(problems.join("; ")));
    }

    tracing::info!(records = records.len(), "Analysis started");

    let metrics = extract_metrics(records, config)?;
    let evaluation = score_phases(&metrics, config);
    let rationale = rationale::render(&metrics, &evaluation);

    Ok(AnalysisResult {
        selected_phase: evaluation.selected,
        confidence: evaluation.confidence,
        metrics,
        phase_scores: evaluation.scores,
        fired_rules: evaluation.fired,
        rationale,
    })
}
