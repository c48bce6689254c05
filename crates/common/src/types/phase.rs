use serde::{Deserialize, Serialize};
use std::fmt;

/// Hype Cycle maturity phases.
///
/// Declaration order is the canonical maturity ordering, so `Ord` compares
/// phases by maturity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    TechnologyTrigger,
    PeakOfInflatedExpectations,
    TroughOfDisillusionment,
    SlopeOfEnlightenment,
    PlateauOfProductivity,
}

impl Phase {
    /// All phases in canonical maturity order.
    pub const ALL: [Phase; 5] = [
        Self::TechnologyTrigger,
        Self::PeakOfInflatedExpectations,
        Self::TroughOfDisillusionment,
        Self::SlopeOfEnlightenment,
        Self::PlateauOfProductivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnologyTrigger => "technology_trigger",
            Self::PeakOfInflatedExpectations => "peak_of_inflated_expectations",
            Self::TroughOfDisillusionment => "trough_of_disillusionment",
            Self::SlopeOfEnlightenment => "slope_of_enlightenment",
            Self::PlateauOfProductivity => "plateau_of_productivity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TechnologyTrigger => "Technology Trigger",
            Self::PeakOfInflatedExpectations => "Peak of Inflated Expectations",
            Self::TroughOfDisillusionment => "Trough of Disillusionment",
            Self::SlopeOfEnlightenment => "Slope of Enlightenment",
            Self::PlateauOfProductivity => "Plateau of Productivity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::TechnologyTrigger => {
                "A potential breakthrough kicks things off. Early proof-of-concept work \
                 draws attention, usable products rarely exist and commercial viability \
                 is unproven."
            }
            Self::PeakOfInflatedExpectations => {
                "Early publicity produces a run of success stories, often alongside many \
                 failures. Activity and attention peak."
            }
            Self::TroughOfDisillusionment => {
                "Interest wanes as experiments and implementations fail to deliver. \
                 Activity declines and producers shake out."
            }
            Self::SlopeOfEnlightenment => {
                "Practical benefits crystallize and become widely understood. \
                 Second- and third-generation products appear."
            }
            Self::PlateauOfProductivity => {
                "Mainstream adoption takes off. Broad market applicability is paying off \
                 and research turns to incremental improvement."
            }
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
