use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a scoring rule: a named predicate over a metrics snapshot.
///
/// Rules are independent of phases. The weight table decides which phase a
/// rule contributes to and with what weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    // Velocity shape
    VelocityIncreasing,
    VelocityDecreasing,
    VelocityRisingOrPeaked,
    VelocityStableOrRising,
    VelocityFlatOrDeclining,
    // Volume and peak timing
    EarlyVolume,
    NearPeakVelocity,
    PeakRecentlyPassed,
    PeakMatured,
    PeakLongPast,
    LatestBelowPeak,
    // Citations
    LowAverageCitations,
    HighAverageCitations,
    CitationGrowthRapid,
    CitationGrowthModerate,
    CitationGrowthLow,
    CitationGrowthNegative,
    // Research mix
    BasicDominant,
    AppliedInHypeBand,
    AppliedDominant,
    AppliedVeryHigh,
    // Venues
    IndustryVenuesLow,
    IndustryVenuesHigh,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VelocityIncreasing => "velocity_increasing",
            Self::VelocityDecreasing => "velocity_decreasing",
            Self::VelocityRisingOrPeaked => "velocity_rising_or_peaked",
            Self::VelocityStableOrRising => "velocity_stable_or_rising",
            Self::VelocityFlatOrDeclining => "velocity_flat_or_declining",
            Self::EarlyVolume => "early_volume",
            Self::NearPeakVelocity => "near_peak_velocity",
            Self::PeakRecentlyPassed => "peak_recently_passed",
            Self::PeakMatured => "peak_matured",
            Self::PeakLongPast => "peak_long_past",
            Self::LatestBelowPeak => "latest_below_peak",
            Self::LowAverageCitations => "low_average_citations",
            Self::HighAverageCitations => "high_average_citations",
            Self::CitationGrowthRapid => "citation_growth_rapid",
            Self::CitationGrowthModerate => "citation_growth_moderate",
            Self::CitationGrowthLow => "citation_growth_low",
            Self::CitationGrowthNegative => "citation_growth_negative",
            Self::BasicDominant => "basic_dominant",
            Self::AppliedInHypeBand => "applied_in_hype_band",
            Self::AppliedDominant => "applied_dominant",
            Self::AppliedVeryHigh => "applied_very_high",
            Self::IndustryVenuesLow => "industry_venues_low",
            Self::IndustryVenuesHigh => "industry_venues_high",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
