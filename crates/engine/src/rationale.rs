//! Rationale Generator: a human-readable explanation of the selected phase.

use std::fmt::Write;

use hypecycle_common::types::{MetricsSnapshot, RuleId};

use crate::scoring::PhaseEvaluation;

/// Fired rules quoted as key indicators.
const MAX_INDICATORS: usize = 4;

/// Render the explanation. Pure: the same inputs always give the same text.
pub fn render(metrics: &MetricsSnapshot, eval: &PhaseEvaluation) -> String {
    let mut out = String::new();
    let phase = eval.selected;

    let _ = writeln!(
        out,
        "Phase determined: {} (confidence {:.2})",
        phase.display_name(),
        eval.confidence
    );
    let _ = writeln!(out, "{}", phase.description());
    out.push('\n');

    let fired = eval.fired.get(&phase).map(Vec::as_slice).unwrap_or_default();
    out.push_str("Key indicators:\n");
    if fired.is_empty() {
        out.push_str("- No rule for this phase fired; it was chosen by tie-break order.\n");
    }
    for f in fired.iter().take(MAX_INDICATORS) {
        let _ = writeln!(out, "- {}", indicator(f.rule, metrics));
    }

    if !eval.tied_with.is_empty() {
        let names: Vec<&str> = eval.tied_with.iter().map(|p| p.display_name()).collect();
        let _ = writeln!(
            out,
            "Note: tied with {} at {:.2}; the later phase in the tie-break order was chosen.",
            names.join(", "),
            eval.confidence
        );
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Evidence base: {} records analyzed ({} total, {} undated, {} skipped), {}-{}.",
        metrics.analyzed_records,
        metrics.total_records,
        metrics.undated_records,
        metrics.skipped_records,
        metrics.first_year,
        metrics.last_year
    );
    out.push('\n');

    out.push_str("Phase scores (for comparison):\n");
    for (p, score) in eval.scores.ranked() {
        let marker = if p == phase { " (selected)" } else { "" };
        let _ = writeln!(out, "- {}: {:.2}{}", p.display_name(), score, marker);
    }

    out.trim_end().to_string()
}

/// One line describing a fired rule with the metric values behind it.
fn indicator(rule: RuleId, m: &MetricsSnapshot) -> String {
    match rule {
        RuleId::VelocityIncreasing
        | RuleId::VelocityDecreasing
        | RuleId::VelocityRisingOrPeaked
        | RuleId::VelocityStableOrRising
        | RuleId::VelocityFlatOrDeclining => format!(
            "Publication velocity is {} ({:.1} records/year over the recent window)",
            m.velocity_trend.as_str().replace('_', " "),
            m.recent_velocity
        ),
        RuleId::EarlyVolume => format!(
            "Low total volume: {} dated records",
            m.analyzed_records
        ),
        RuleId::NearPeakVelocity | RuleId::PeakRecentlyPassed => format!(
            "Publication peak in {} ({} records), {} year(s) ago",
            m.peak_year, m.peak_count, m.years_since_peak
        ),
        RuleId::PeakMatured | RuleId::PeakLongPast => format!(
            "Publication peak in {} is {} years behind the latest data",
            m.peak_year, m.years_since_peak
        ),
        RuleId::LatestBelowPeak => format!(
            "Latest year has {} records against a peak of {}",
            m.records_last_year, m.peak_count
        ),
        RuleId::LowAverageCitations | RuleId::HighAverageCitations => format!(
            "Average engagement of {:.1} per record (median {:.1})",
            m.avg_citations, m.median_citations
        ),
        RuleId::CitationGrowthRapid
        | RuleId::CitationGrowthModerate
        | RuleId::CitationGrowthLow
        | RuleId::CitationGrowthNegative => format!(
            "Engagement growth of {:+.1}% between the prior and recent windows",
            m.citation_growth_rate
        ),
        RuleId::BasicDominant
        | RuleId::AppliedInHypeBand
        | RuleId::AppliedDominant
        | RuleId::AppliedVeryHigh => format!(
            "Research mix: {:.1}% applied, {:.1}% basic, {:.1}% mixed",
            m.applied_pct, m.basic_pct, m.mixed_pct
        ),
        RuleId::IndustryVenuesLow | RuleId::IndustryVenuesHigh => format!(
            "Industry venues account for {:.1}% of records with a known venue",
            m.venue_industry_pct
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use hypecycle_common::config::{AnalysisConfig, PhaseRuleWeights};
    use hypecycle_common::types::{Phase, VelocityTrend};

    use crate::scoring::score_phases;

    fn metrics() -> MetricsSnapshot {
        MetricsSnapshot {
            total_records: 160,
            analyzed_records: 150,
            undated_records: 10,
            records_with_engagement: 150,
            avg_citations: 5.0,
            first_year: 2020,
            last_year: 2024,
            peak_year: 2024,
            peak_count: 60,
            recent_velocity: 50.0,
            velocity_trend: VelocityTrend::Increasing,
            ..MetricsSnapshot::default()
        }
    }

    #[test]
    fn test_rationale_sections() {
        let m = metrics();
        let eval = score_phases(&m, &AnalysisConfig::default());
        let text = render(&m, &eval);

        assert!(text.starts_with("Phase determined: "));
        assert!(text.contains(eval.selected.display_name()));
        assert!(text.contains(&format!("confidence {:.2}", eval.confidence)));
        assert!(text.contains("Key indicators:"));
        assert!(text.contains("Publication velocity is increasing"));
        assert!(text.contains("150 records analyzed (160 total, 10 undated, 0 skipped), 2020-2024"));
        assert!(text.contains("Phase scores (for comparison):"));
        for phase in Phase::ALL {
            assert!(text.contains(phase.display_name()));
        }
    }

    #[test]
    fn test_rationale_is_deterministic() {
        let m = metrics();
        let eval = score_phases(&m, &AnalysisConfig::default());
        assert_eq!(render(&m, &eval), render(&m, &eval));
    }

    #[test]
    fn test_rationale_mentions_tie_break_when_nothing_fired() {
        let m = MetricsSnapshot::default();
        let mut eval = score_phases(&m, &AnalysisConfig::default());
        for rules in eval.fired.values_mut() {
            rules.clear();
        }
        let text = render(&m, &eval);
        assert!(text.contains("chosen by tie-break order"));
    }

    #[test]
    fn test_score_table_marks_tied_winner() {
        let m = MetricsSnapshot::default();
        let mut config = AnalysisConfig::default();
        config.phase_rule_weights = PhaseRuleWeights(BTreeMap::new());
        for phase in [Phase::TechnologyTrigger, Phase::SlopeOfEnlightenment] {
            config
                .phase_rule_weights
                .set(phase, RuleId::VelocityStableOrRising, 1.0);
        }
        for phase in [
            Phase::PeakOfInflatedExpectations,
            Phase::TroughOfDisillusionment,
            Phase::PlateauOfProductivity,
        ] {
            config
                .phase_rule_weights
                .set(phase, RuleId::VelocityDecreasing, 1.0);
        }

        let eval = score_phases(&m, &config);
        assert_eq!(eval.selected, Phase::SlopeOfEnlightenment);

        let text = render(&m, &eval);
        let table = text
            .split("Phase scores (for comparison):\n")
            .nth(1)
            .unwrap();
        let mut lines = table.lines();
        // Ties stay in canonical order; the marker shows which one won.
        assert_eq!(lines.next(), Some("- Technology Trigger: 1.00"));
        assert_eq!(lines.next(), Some("- Slope of Enlightenment: 1.00 (selected)"));
    }
}
