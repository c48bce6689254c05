//! Phase Scorer: turns a metrics snapshot into per-phase scores and picks
//! the winning phase.

mod rules;

use std::collections::BTreeMap;

use hypecycle_common::config::AnalysisConfig;
use hypecycle_common::types::{FiredRule, MetricsSnapshot, Phase, PhaseScores};

pub use rules::holds;

/// Scores are rounded to this many decimal places so that equal rule sets
/// produce bit-identical scores and ties are decided by the tie-break order.
const SCORE_DECIMALS: i32 = 6;

/// Everything the scorer concluded about one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseEvaluation {
    pub scores: PhaseScores,
    /// Fired rules per phase, heaviest first.
    pub fired: BTreeMap<Phase, Vec<FiredRule>>,
    pub selected: Phase,
    pub confidence: f64,
    /// Other phases whose score equals the winner's.
    pub tied_with: Vec<Phase>,
}

/// Score every phase against the configured weight table and select one.
///
/// A phase's score is the sum of the weights of its fired rules divided by
/// the sum of all its weights, so it always lies in [0, 1].
pub fn score_phases(metrics: &MetricsSnapshot, config: &AnalysisConfig) -> PhaseEvaluation {
    let mut scores = PhaseScores::new();
    let mut fired = BTreeMap::new();

    for phase in Phase::ALL {
        let rules = config.phase_rule_weights.rules_for(phase);
        let total: f64 = rules.map(|r| r.values().sum()).unwrap_or(0.0);

        let mut phase_fired: Vec<FiredRule> = rules
            .into_iter()
            .flatten()
            .filter(|(rule, _)| holds(**rule, metrics, &config.thresholds))
            .map(|(rule, weight)| FiredRule {
                rule: *rule,
                weight: *weight,
            })
            .collect();
        phase_fired.sort_by(|a, b| b.weight.total_cmp(&a.weight).then(a.rule.cmp(&b.rule)));

        let fired_sum: f64 = phase_fired.iter().map(|f| f.weight).sum();
        let score = if total > 0.0 {
            round_score(fired_sum / total)
        } else {
            0.0
        };

        tracing::debug!(
            phase = phase.as_str(),
            score,
            fired = phase_fired.len(),
            "Phase scored"
        );

        scores.insert(phase, score);
        fired.insert(phase, phase_fired);
    }

    let selected = select_phase(&scores, &config.tie_break_order);
    let confidence = scores.get(selected);
    let tied_with = Phase::ALL
        .into_iter()
        .filter(|p| *p != selected && scores.get(*p) == confidence)
        .collect();

    PhaseEvaluation {
        scores,
        fired,
        selected,
        confidence,
        tied_with,
    }
}

/// The phase with the maximum score. Among equal maxima, the phase that
/// appears latest in `tie_break_order` wins; phases missing from the order
/// rank below every listed phase.
pub fn select_phase(scores: &PhaseScores, tie_break_order: &[Phase]) -> Phase {
    let rank = |phase: Phase| tie_break_order.iter().position(|p| *p == phase);

    let mut best = Phase::TechnologyTrigger;
    let mut best_score = f64::NEG_INFINITY;
    for phase in Phase::ALL {
        let score = scores.get(phase);
        let wins = score > best_score || (score == best_score && rank(phase) > rank(best));
        if wins {
            best = phase;
            best_score = score;
        }
    }
    best
}

fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    ((score * factor).round() / factor).clamp(0.0, 1.0)
}
