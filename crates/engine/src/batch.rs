use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::Instrument;

use hypecycle_common::config::AnalysisConfig;
use hypecycle_common::types::{AnalysisResult, EvidenceRecord};
use hypecycle_common::{HypeCycleError, Result};

use crate::analysis::analyze;

/// One record collection to analyze, e.g. one technology.
#[derive(Clone, Debug)]
pub struct AnalysisJob {
    pub label: String,
    pub records: Vec<EvidenceRecord>,
}

impl AnalysisJob {
    pub fn new(label: impl Into<String>, records: Vec<EvidenceRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }
}

/// Outcome of one job, in the same position as the job was submitted.
#[derive(Debug)]
pub struct BatchOutcome {
    pub label: String,
    pub result: Result<AnalysisResult>,
}

/// Wire shape of an outcome: exactly one of `result` or `error` is present.
#[derive(Serialize)]
pub struct OutcomeReport<'a> {
    pub label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn report(&self) -> OutcomeReport<'_> {
        match &self.result {
            Ok(result) => OutcomeReport {
                label: &self.label,
                result: Some(result),
                error: None,
            },
            Err(e) => OutcomeReport {
                label: &self.label,
                result: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Analyze independent record collections concurrently.
///
/// Each analysis runs on tokio's blocking pool, with at most `pool_size`
/// running at once. Outcomes are returned in job order; one job failing
/// does not affect the others.
pub async fn analyze_batch(
    jobs: Vec<AnalysisJob>,
    config: Arc<AnalysisConfig>,
    pool_size: u32,
) -> Vec<BatchOutcome> {
    let permits = Arc::new(Semaphore::new(pool_size.max(1) as usize));
    let mut handles = Vec::with_capacity(jobs.len());

    tracing::info!(jobs = jobs.len(), pool_size, "Batch analysis started");

    for job in jobs {
        let permits = Arc::clone(&permits);
        let config = Arc::clone(&config);
        let label = job.label.clone();
        let span = tracing::info_span!("analysis", label = %job.label);

        let handle = tokio::spawn(
            async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| HypeCycleError::Internal(format!("worker pool closed: {}", e)))?;

                let span = tracing::Span::current();
                tokio::task::spawn_blocking(move || {
                    let _enter = span.enter();
                    analyze(&job.records, &config)
                })
                .await
                .map_err(|e| HypeCycleError::Internal(format!("analysis task failed: {}", e)))?
            }
            .instrument(span),
        );
        handles.push((label, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (label, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(HypeCycleError::Internal(format!("analysis task failed: {}", e))),
        };
        outcomes.push(BatchOutcome { label, result });
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(
        jobs = outcomes.len(),
        failed,
        "Batch analysis complete"
    );

    outcomes
}
