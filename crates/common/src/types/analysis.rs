use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metrics::MetricsSnapshot;
use super::phase::Phase;
use super::rule::RuleId;

/// Score in [0, 1] for every phase, keyed in canonical maturity order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseScores(BTreeMap<Phase, f64>);

impl PhaseScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, phase: Phase, score: f64) {
        self.0.insert(phase, score);
    }

    pub fn get(&self, phase: Phase) -> f64 {
        self.0.get(&phase).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in canonical maturity order.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, f64)> + '_ {
        self.0.iter().map(|(p, s)| (*p, *s))
    }

    /// Entries sorted by score descending, ties in canonical order.
    pub fn ranked(&self) -> Vec<(Phase, f64)> {
        let mut entries: Vec<(Phase, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}

/// A rule that held on the snapshot, with the weight it contributed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredRule {
    pub rule: RuleId,
    pub weight: f64,
}

/// Output of one analysis run. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub selected_phase: Phase,
    /// The winning phase's own score.
    pub confidence: f64,
    pub metrics: MetricsSnapshot,
    pub phase_scores: PhaseScores,
    /// Rules that fired per phase, heaviest first.
    pub fired_rules: BTreeMap<Phase, Vec<FiredRule>>,
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_breaks_ties_in_canonical_order() {
        let mut scores = PhaseScores::new();
        scores.insert(Phase::PlateauOfProductivity, 0.5);
        scores.insert(Phase::TechnologyTrigger, 0.2);
        scores.insert(Phase::SlopeOfEnlightenment, 0.5);
        scores.insert(Phase::TroughOfDisillusionment, 0.0);
        scores.insert(Phase::PeakOfInflatedExpectations, 0.2);

        let ranked: Vec<Phase> = scores.ranked().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            ranked,
            vec![
                Phase::SlopeOfEnlightenment,
                Phase::PlateauOfProductivity,
                Phase::TechnologyTrigger,
                Phase::PeakOfInflatedExpectations,
                Phase::TroughOfDisillusionment,
            ]
        );
    }

    #[test]
    fn test_scores_serialize_as_phase_map() {
        let mut scores = PhaseScores::new();
        scores.insert(Phase::TechnologyTrigger, 0.25);
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["technology_trigger"], 0.25);
    }
}
