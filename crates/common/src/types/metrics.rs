use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::SourceKind;

/// Shape of the publication-velocity series over the most recent years.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
    /// The latest year is the unique maximum of the whole series.
    PeakReached,
}

impl VelocityTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
            Self::PeakReached => "peak_reached",
        }
    }
}

/// Direction in which the applied-research share is moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchTrend {
    TowardApplied,
    TowardBasic,
    #[default]
    Stable,
}

impl ResearchTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TowardApplied => "toward_applied",
            Self::TowardBasic => "toward_basic",
            Self::Stable => "stable",
        }
    }
}

/// A keyword whose recent-window rate differs from its full-history rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordTrend {
    pub term: String,
    pub total_count: usize,
    pub recent_count: usize,
    /// Recent-window rate divided by full-history rate (per record).
    pub lift: f64,
}

/// Summary metrics derived from one record collection.
///
/// Rebuilt from scratch on every run. All percentages are on a 0–100 scale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // --- Record accounting ---
    /// Size of the input collection.
    pub total_records: usize,
    /// Records with a resolvable year (the velocity/citation population).
    pub analyzed_records: usize,
    /// Records without a date that still carry text.
    pub undated_records: usize,
    /// Malformed records (no date, no text) that contribute to nothing.
    pub skipped_records: usize,
    pub records_with_text: usize,
    pub records_with_engagement: usize,

    // --- Publication velocity ---
    /// Year -> record count, ascending, zero-filled between first and last year.
    pub velocity_by_year: BTreeMap<i32, usize>,
    pub first_year: i32,
    pub last_year: i32,
    /// Earliest year holding the maximum count.
    pub peak_year: i32,
    pub peak_count: usize,
    pub years_since_peak: i32,
    pub avg_records_per_year: f64,
    /// Mean count over the most recent window.
    pub recent_velocity: f64,
    /// Year-over-year deltas over the last four buckets, oldest first.
    pub velocity_deltas: Vec<i64>,
    pub velocity_trend: VelocityTrend,

    // --- Engagement ---
    /// Sum of reported counts, saturating at `u64::MAX`.
    pub total_citations: u64,
    pub avg_citations: f64,
    pub median_citations: f64,
    /// Signed percentage change of mean engagement, recent window vs the
    /// window before it. Capped at the configured sentinel.
    pub citation_growth_rate: f64,
    pub highly_cited_count: usize,
    /// Share of dated records that report an engagement count.
    pub engagement_coverage_pct: f64,

    // --- Research type (over the classified subset only) ---
    /// Text-bearing records matching at least one lexicon.
    pub classified_records: usize,
    /// Text-bearing records matching neither lexicon; reported, never folded in.
    /// Records without text are in neither count, only in `coverage_pct`.
    pub unclassified_records: usize,
    pub basic_pct: f64,
    pub applied_pct: f64,
    pub mixed_pct: f64,
    pub research_trend: ResearchTrend,

    // --- Keywords ---
    /// Most frequent first, ties broken lexicographically ascending.
    pub top_keywords: Vec<(String, usize)>,
    pub emerging_keywords: Vec<KeywordTrend>,
    pub declining_keywords: Vec<KeywordTrend>,

    // --- Venues (records with unknown venue excluded) ---
    pub known_venue_records: usize,
    pub venue_academic_pct: f64,
    pub venue_industry_pct: f64,
    pub conference_pct: f64,
    pub journal_pct: f64,

    // --- Categories and sources ---
    pub top_categories: Vec<(String, usize)>,
    /// Herfindahl index over category-tag shares, in [0, 1].
    pub category_concentration_hhi: f64,
    pub source_counts: BTreeMap<SourceKind, usize>,

    // --- Temporal comparison ---
    pub records_last_year: usize,
    pub records_last_2_years: usize,
    pub records_first_2_years: usize,
    pub growth_rate_early_vs_late: f64,

    // --- Data quality ---
    /// Share of input records with usable text content.
    pub coverage_pct: f64,
}
