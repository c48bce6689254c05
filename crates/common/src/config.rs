use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Phase, RuleId};

/// Top-level system configuration, deserialized from analysis.toml.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub analysis: AnalysisConfig,
    pub concurrency: ConcurrencyConfig,
}

/// Concurrency parameters for batch analysis.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Max analyses running at once on the blocking pool.
    pub worker_pool_size: u32,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: 4,
        }
    }
}

/// Everything one analysis run reads. Passed explicitly into every call;
/// there is no process-wide configuration state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum number of dated records for an analysis to run.
    pub min_records: usize,
    /// Size of the "recent" window in years, counted back from the latest year.
    pub recent_window_years: u32,
    /// Engagement count at or above which a record is highly cited.
    pub highly_cited_threshold: u64,
    /// Growth rate reported when the prior window mean is zero and the
    /// recent mean is positive. Also the upper clamp for any growth rate.
    pub citation_growth_cap: f64,
    /// Relative deviation of recent vs prior window mean that counts as a trend.
    pub velocity_trend_threshold: f64,
    /// Percentage-point shift in applied share that counts as a research trend.
    pub research_trend_threshold: f64,
    /// Let undated records contribute to keyword, research and venue stats.
    pub allow_undated_text_stats: bool,
    /// Run basic/applied classification. Requires non-empty lexicons.
    pub classify_research_type: bool,
    pub basic_keywords: Vec<String>,
    pub applied_keywords: Vec<String>,
    pub stop_words: Vec<String>,
    /// Shortest token counted as a keyword.
    pub min_token_length: usize,
    pub top_keywords_limit: usize,
    pub emerging_keywords_limit: usize,
    pub emerging_keyword_ratio: f64,
    pub emerging_keyword_min_count: usize,
    pub top_categories_limit: usize,
    pub thresholds: RuleThresholds,
    pub phase_rule_weights: PhaseRuleWeights,
    /// Later entries win ties.
    pub tie_break_order: Vec<Phase>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_records: 100,
            recent_window_years: 2,
            highly_cited_threshold: 100,
            citation_growth_cap: 1000.0,
            velocity_trend_threshold: 0.05,
            research_trend_threshold: 10.0,
            allow_undated_text_stats: false,
            classify_research_type: true,
            basic_keywords: to_strings(DEFAULT_BASIC_KEYWORDS),
            applied_keywords: to_strings(DEFAULT_APPLIED_KEYWORDS),
            stop_words: to_strings(DEFAULT_STOP_WORDS),
            min_token_length: 4,
            top_keywords_limit: 20,
            emerging_keywords_limit: 10,
            emerging_keyword_ratio: 1.5,
            emerging_keyword_min_count: 3,
            top_categories_limit: 10,
            thresholds: RuleThresholds::default(),
            phase_rule_weights: PhaseRuleWeights::default(),
            tie_break_order: Phase::ALL.to_vec(),
        }
    }
}

/// Numeric thresholds the scoring rules compare metrics against.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// Dated-record total below which a technology still looks early.
    pub maturity_baseline_records: usize,
    pub low_citation_avg: f64,
    pub high_citation_avg: f64,
    /// Growth rate (%) above which citation growth is rapid.
    pub citation_growth_rapid: f64,
    /// Growth rate (%) at which citation growth becomes moderate.
    pub citation_growth_moderate: f64,
    pub applied_research_high: f64,
    pub applied_research_very_high: f64,
    pub hype_band_low: f64,
    pub hype_band_high: f64,
    pub industry_venue_low: f64,
    pub industry_venue_high: f64,
    pub peak_recency_years: i32,
    pub peak_matured_min_years: i32,
    pub peak_matured_max_years: i32,
    pub peak_long_past_years: i32,
    /// Latest-year count below this fraction of the peak counts as a drop.
    pub latest_below_peak_ratio: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            maturity_baseline_records: 500,
            low_citation_avg: 20.0,
            high_citation_avg: 50.0,
            citation_growth_rapid: 30.0,
            citation_growth_moderate: 10.0,
            applied_research_high: 60.0,
            applied_research_very_high: 80.0,
            hype_band_low: 40.0,
            hype_band_high: 60.0,
            industry_venue_low: 10.0,
            industry_venue_high: 30.0,
            peak_recency_years: 3,
            peak_matured_min_years: 4,
            peak_matured_max_years: 7,
            peak_long_past_years: 8,
            latest_below_peak_ratio: 0.7,
        }
    }
}

/// Declarative scoring table: phase -> rule -> weight.
///
/// Weights are normalized per phase at scoring time, so only their ratios
/// within a phase matter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseRuleWeights(pub BTreeMap<Phase, BTreeMap<RuleId, f64>>);

impl PhaseRuleWeights {
    pub fn rules_for(&self, phase: Phase) -> Option<&BTreeMap<RuleId, f64>> {
        self.0.get(&phase)
    }

    pub fn set(&mut self, phase: Phase, rule: RuleId, weight: f64) {
        self.0.entry(phase).or_default().insert(rule, weight);
    }
}

impl Default for PhaseRuleWeights {
    fn default() -> Self {
        use Phase::*;
        use RuleId::*;

        let table: [(Phase, &[(RuleId, f64)]); 5] = [
            (
                TechnologyTrigger,
                &[
                    (VelocityIncreasing, 0.30),
                    (BasicDominant, 0.25),
                    (EarlyVolume, 0.20),
                    (LowAverageCitations, 0.15),
                    (IndustryVenuesLow, 0.10),
                ],
            ),
            (
                PeakOfInflatedExpectations,
                &[
                    (NearPeakVelocity, 0.30),
                    (CitationGrowthRapid, 0.25),
                    (AppliedInHypeBand, 0.25),
                    (VelocityRisingOrPeaked, 0.20),
                ],
            ),
            (
                TroughOfDisillusionment,
                &[
                    (VelocityDecreasing, 0.35),
                    (PeakRecentlyPassed, 0.30),
                    (CitationGrowthNegative, 0.20),
                    (LatestBelowPeak, 0.15),
                ],
            ),
            (
                SlopeOfEnlightenment,
                &[
                    (AppliedDominant, 0.30),
                    (VelocityStableOrRising, 0.25),
                    (CitationGrowthModerate, 0.25),
                    (PeakMatured, 0.20),
                ],
            ),
            (
                PlateauOfProductivity,
                &[
                    (AppliedVeryHigh, 0.35),
                    (VelocityFlatOrDeclining, 0.25),
                    (CitationGrowthLow, 0.20),
                    (IndustryVenuesHigh, 0.10),
                    (PeakLongPast, 0.10),
                ],
            ),
        ];

        let mut weights = BTreeMap::new();
        for (phase, rules) in table {
            weights.insert(phase, rules.iter().copied().collect());
        }
        Self(weights)
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Vocabulary of fundamental, mechanism-oriented research.
pub const DEFAULT_BASIC_KEYWORDS: &[&str] = &[
    "mechanism",
    "pathway",
    "fundamental",
    "theoretical",
    "discovery",
    "novel",
    "characterization",
    "identification",
    "isolation",
    "purification",
    "analysis of",
    "role of",
    "function of",
    "expression of",
    "regulation of",
    "molecular",
    "cellular",
    "biochemical",
    "genetics",
    "genomics",
    "proteomics",
    "metabolomics",
    "in vitro",
    "model system",
    "structure",
    "evolution",
    "phylogeny",
    "diversity",
    "morphology",
    "physiology",
];

/// Vocabulary of application- and product-oriented research.
pub const DEFAULT_APPLIED_KEYWORDS: &[&str] = &[
    "application",
    "production",
    "optimization",
    "yield",
    "efficiency",
    "commercial",
    "industrial",
    "scalable",
    "scale-up",
    "process",
    "manufacturing",
    "product",
    "development",
    "implementation",
    "protocol",
    "method",
    "therapeutic",
    "treatment",
    "drug",
    "bioactive",
    "functional food",
    "bioreactor",
    "cultivation",
    "cost-effective",
    "sustainable production",
    "market",
    "industry",
    "economic",
    "practical",
    "clinical",
    "pilot scale",
];

pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "this", "that", "with", "from", "were", "have", "been", "their", "which", "these", "more",
    "other", "such", "into", "only", "also", "than", "some", "time", "very", "when", "them",
    "they", "there", "where", "what", "about", "after", "before", "would", "could", "should",
    "being", "between", "through", "during", "using", "based", "while", "both", "each", "most",
    "over", "under", "will", "upon", "here", "those", "then", "however", "within", "without",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_cover_every_phase() {
        let weights = PhaseRuleWeights::default();
        for phase in Phase::ALL {
            let rules = weights.rules_for(phase).unwrap();
            let total: f64 = rules.values().sum();
            assert!((total - 1.0).abs() < 1e-9, "{} sums to {}", phase, total);
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SystemConfig = toml::from_str(
            r#"
            [analysis]
            min_records = 50
            stop_words = ["foo"]

            [analysis.thresholds]
            citation_growth_rapid = 45.0
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.min_records, 50);
        assert_eq!(config.analysis.recent_window_years, 2);
        assert_eq!(config.analysis.stop_words, vec!["foo".to_string()]);
        assert_eq!(config.analysis.thresholds.citation_growth_rapid, 45.0);
        assert_eq!(config.analysis.thresholds.peak_recency_years, 3);
        assert_eq!(config.analysis.tie_break_order, Phase::ALL.to_vec());
        assert_eq!(config.concurrency.worker_pool_size, 4);
    }

    #[test]
    fn test_weights_table_from_toml() {
        let config: SystemConfig = toml::from_str(
            r#"
            [analysis.phase_rule_weights.technology_trigger]
            velocity_increasing = 2.0
            basic_dominant = 1.0
            "#,
        )
        .unwrap();

        let rules = config
            .analysis
            .phase_rule_weights
            .rules_for(Phase::TechnologyTrigger)
            .unwrap();
        assert_eq!(rules.get(&RuleId::VelocityIncreasing), Some(&2.0));
        assert_eq!(rules.len(), 2);
        assert!(config
            .analysis
            .phase_rule_weights
            .rules_for(Phase::PlateauOfProductivity)
            .is_none());
    }
}
