//! Rule predicates over a metrics snapshot.
//!
//! Each [`RuleId`] maps to exactly one boolean predicate here. Rules that
//! depend on a sub-population (engagement data, classified records, known
//! venues) never fire when that population is empty.

use hypecycle_common::config::RuleThresholds;
use hypecycle_common::types::{MetricsSnapshot, RuleId, VelocityTrend};

/// Whether `rule` holds on `m`.
pub fn holds(rule: RuleId, m: &MetricsSnapshot, t: &RuleThresholds) -> bool {
    use VelocityTrend::*;

    let has_engagement = m.records_with_engagement > 0;
    let has_classified = m.classified_records > 0;
    let has_venues = m.known_venue_records > 0;
    let growth = m.citation_growth_rate;

    match rule {
        RuleId::VelocityIncreasing => m.velocity_trend == Increasing,
        RuleId::VelocityDecreasing => m.velocity_trend == Decreasing,
        RuleId::VelocityRisingOrPeaked => matches!(m.velocity_trend, Increasing | PeakReached),
        RuleId::VelocityStableOrRising => matches!(m.velocity_trend, Stable | Increasing),
        RuleId::VelocityFlatOrDeclining => matches!(m.velocity_trend, Stable | Decreasing),

        RuleId::EarlyVolume => m.analyzed_records < t.maturity_baseline_records,
        RuleId::NearPeakVelocity => m.years_since_peak <= t.peak_recency_years,
        RuleId::PeakRecentlyPassed => {
            m.years_since_peak >= 1 && m.years_since_peak <= t.peak_recency_years
        }
        RuleId::PeakMatured => {
            m.years_since_peak >= t.peak_matured_min_years
                && m.years_since_peak <= t.peak_matured_max_years
        }
        RuleId::PeakLongPast => m.years_since_peak >= t.peak_long_past_years,
        RuleId::LatestBelowPeak => {
            let latest = m.velocity_by_year.get(&m.last_year).copied().unwrap_or(0);
            (latest as f64) < m.peak_count as f64 * t.latest_below_peak_ratio
        }

        RuleId::LowAverageCitations => has_engagement && m.avg_citations < t.low_citation_avg,
        RuleId::HighAverageCitations => has_engagement && m.avg_citations > t.high_citation_avg,
        RuleId::CitationGrowthRapid => has_engagement && growth > t.citation_growth_rapid,
        RuleId::CitationGrowthModerate => {
            has_engagement
                && growth >= t.citation_growth_moderate
                && growth <= t.citation_growth_rapid
        }
        RuleId::CitationGrowthLow => has_engagement && growth.abs() < t.citation_growth_moderate,
        RuleId::CitationGrowthNegative => has_engagement && growth < 0.0,

        RuleId::BasicDominant => has_classified && m.basic_pct > m.applied_pct,
        RuleId::AppliedInHypeBand => {
            has_classified && m.applied_pct >= t.hype_band_low && m.applied_pct <= t.hype_band_high
        }
        RuleId::AppliedDominant => {
            has_classified
                && m.applied_pct >= t.applied_research_high
                && m.applied_pct < t.applied_research_very_high
                && m.applied_pct > m.basic_pct
        }
        RuleId::AppliedVeryHigh => has_classified && m.applied_pct >= t.applied_research_very_high,

        RuleId::IndustryVenuesLow => has_venues && m.venue_industry_pct < t.industry_venue_low,
        RuleId::IndustryVenuesHigh => has_venues && m.venue_industry_pct > t.industry_venue_high,
    }
}
