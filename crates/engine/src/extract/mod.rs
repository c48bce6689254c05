//! Metrics Extractor: reduces a record collection to a [`MetricsSnapshot`].
//!
//! A cheap scan resolves the year range and the usable-record count (so
//! below-threshold collections fail before any text is touched), then one
//! pass over the records feeds every running aggregate. Each record is
//! tokenized once and the tokens are shared by research classification and
//! keyword counting.

mod citations;
mod keywords;
mod research;
mod velocity;
mod venues;

use std::collections::BTreeMap;

use hypecycle_common::config::AnalysisConfig;
use hypecycle_common::types::{EvidenceRecord, MetricsSnapshot};
use hypecycle_common::{HypeCycleError, Result};

use citations::EngagementTally;
use keywords::KeywordCounter;
use research::{Period, ResearchClassifier, ResearchTally};
use venues::{CategoryTally, VenueTally};

/// The recent window and the window immediately before it, in whole years
/// counted back from the latest year in the data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct YearWindows {
    pub first_year: i32,
    pub last_year: i32,
    window: i32,
}

impl YearWindows {
    pub(crate) fn new(first_year: i32, last_year: i32, window_years: u32) -> Self {
        Self {
            first_year,
            last_year,
            window: i32::try_from(window_years.max(1)).unwrap_or(i32::MAX),
        }
    }

    /// Inclusive bounds of the recent window.
    pub(crate) fn recent(&self) -> (i32, i32) {
        (self.last_year.saturating_sub(self.window - 1), self.last_year)
    }

    /// Inclusive bounds of the prior window, clipped to the observed range.
    /// `None` when the data does not reach back that far.
    pub(crate) fn prior(&self) -> Option<(i32, i32)> {
        let to = self.last_year.checked_sub(self.window)?;
        if to < self.first_year {
            return None;
        }
        Some((to.saturating_sub(self.window - 1).max(self.first_year), to))
    }

    pub(crate) fn is_recent(&self, year: i32) -> bool {
        year >= self.recent().0
    }
}

/// How a record can take part in the analysis.
enum Usage {
    Dated(i32),
    Undated,
    Malformed(HypeCycleError),
}

fn usage(record: &EvidenceRecord) -> Usage {
    if let Err(e) = record.validate() {
        return Usage::Malformed(e);
    }
    match record.year() {
        Some(year) => Usage::Dated(year),
        None => Usage::Undated,
    }
}

/// Summary of the cheap first scan.
struct Census {
    first_year: i32,
    last_year: i32,
    dated: usize,
    skipped: usize,
}

fn census(records: &[EvidenceRecord]) -> Census {
    let mut census = Census {
        first_year: i32::MAX,
        last_year: i32::MIN,
        dated: 0,
        skipped: 0,
    };

    for record in records {
        match usage(record) {
            Usage::Dated(year) => {
                census.dated += 1;
                census.first_year = census.first_year.min(year);
                census.last_year = census.last_year.max(year);
            }
            Usage::Undated => {}
            Usage::Malformed(e) => {
                tracing::debug!(error = %e, "Skipping malformed record");
                census.skipped += 1;
            }
        }
    }

    census
}

/// Build the metrics snapshot for one record collection.
///
/// Fails with [`HypeCycleError::InsufficientData`] when fewer than
/// `config.min_records` records carry a resolvable year. Malformed records
/// are skipped and counted, never fatal on their own.
pub fn extract_metrics(
    records: &[EvidenceRecord],
    config: &AnalysisConfig,
) -> Result<MetricsSnapshot> {
    let census = census(records);

    if census.skipped > 0 {
        tracing::warn!(
            skipped = census.skipped,
            total = records.len(),
            "Malformed records skipped (no date and no text)"
        );
    }

    if census.dated < config.min_records || census.dated == 0 {
        return Err(HypeCycleError::InsufficientData {
            usable: census.dated,
            required: config.min_records,
            skipped: census.skipped,
        });
    }

    let windows = YearWindows::new(
        census.first_year,
        census.last_year,
        config.recent_window_years,
    );

    let classifier = ResearchClassifier::new(config);
    let mut year_counts: BTreeMap<i32, usize> = BTreeMap::new();
    let mut engagement = EngagementTally::default();
    let mut research = ResearchTally::default();
    let mut keywords = KeywordCounter::new(config);
    let mut venue_tally = VenueTally::default();
    let mut categories = CategoryTally::default();
    let mut source_counts = BTreeMap::new();
    let mut records_with_text = 0;
    let mut undated_records = 0;

    for record in records {
        let period = match usage(record) {
            Usage::Malformed(_) => continue,
            Usage::Dated(year) => {
                *year_counts.entry(year).or_default() += 1;
                engagement.observe(year, record.engagement_count, config.highly_cited_threshold);
                if windows.is_recent(year) {
                    Period::Recent
                } else {
                    Period::Earlier
                }
            }
            Usage::Undated => {
                undated_records += 1;
                Period::Undated
            }
        };

        *source_counts.entry(record.source).or_default() += 1;
        let has_text = record.has_text();
        if has_text {
            records_with_text += 1;
        }

        if period == Period::Undated && !config.allow_undated_text_stats {
            continue;
        }

        venue_tally.observe(record.venue());
        categories.observe(&record.category_tags);

        if has_text {
            let tokens = keywords::tokenize_all(&record.text_fields);
            research.observe(classifier.classify(&tokens), period);
            keywords.observe(&tokens, period == Period::Recent);
        }
    }

    tracing::debug!(
        years = year_counts.len(),
        first_year = windows.first_year,
        last_year = windows.last_year,
        "Aggregation pass complete"
    );

    let velocity = velocity::summarize(&year_counts, &windows, config.velocity_trend_threshold);
    let citations = engagement.finish(&windows, config.citation_growth_cap);
    let research = research.finish(config.research_trend_threshold);
    let keywords = keywords.finish(config);
    let venues = venue_tally.finish();
    let categories = categories.finish(config.top_categories_limit);

    let total_records = records.len();
    let pct = |n: usize, of: usize| {
        if of == 0 {
            0.0
        } else {
            n as f64 / of as f64 * 100.0
        }
    };

    Ok(MetricsSnapshot {
        total_records,
        analyzed_records: census.dated,
        undated_records,
        skipped_records: census.skipped,
        records_with_text,
        records_with_engagement: citations.records_with_engagement,

        velocity_by_year: velocity.velocity_by_year,
        first_year: windows.first_year,
        last_year: windows.last_year,
        peak_year: velocity.peak_year,
        peak_count: velocity.peak_count,
        years_since_peak: windows.last_year - velocity.peak_year,
        avg_records_per_year: velocity.avg_records_per_year,
        recent_velocity: velocity.recent_velocity,
        velocity_deltas: velocity.velocity_deltas,
        velocity_trend: velocity.velocity_trend,

        total_citations: citations.total_citations,
        avg_citations: citations.avg_citations,
        median_citations: citations.median_citations,
        citation_growth_rate: citations.citation_growth_rate,
        highly_cited_count: citations.highly_cited_count,
        engagement_coverage_pct: pct(citations.records_with_engagement, census.dated),

        classified_records: research.classified_records,
        unclassified_records: research.unclassified_records,
        basic_pct: research.basic_pct,
        applied_pct: research.applied_pct,
        mixed_pct: research.mixed_pct,
        research_trend: research.research_trend,

        top_keywords: keywords.top_keywords,
        emerging_keywords: keywords.emerging_keywords,
        declining_keywords: keywords.declining_keywords,

        known_venue_records: venues.known_venue_records,
        venue_academic_pct: venues.venue_academic_pct,
        venue_industry_pct: venues.venue_industry_pct,
        conference_pct: venues.conference_pct,
        journal_pct: venues.journal_pct,

        top_categories: categories.top_categories,
        category_concentration_hhi: categories.category_concentration_hhi,
        source_counts,

        records_last_year: velocity.records_last_year,
        records_last_2_years: velocity.records_last_2_years,
        records_first_2_years: velocity.records_first_2_years,
        growth_rate_early_vs_late: velocity.growth_rate_early_vs_late,

        coverage_pct: pct(records_with_text, total_records),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypecycle_common::types::{SourceKind, VenueKind};

    fn config(min_records: usize) -> AnalysisConfig {
        AnalysisConfig {
            min_records,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_windows() {
        let w = YearWindows::new(2015, 2024, 2);
        assert_eq!(w.recent(), (2023, 2024));
        assert_eq!(w.prior(), Some((2021, 2022)));
        assert!(w.is_recent(2023));
        assert!(!w.is_recent(2022));

        let short = YearWindows::new(2022, 2024, 2);
        assert_eq!(short.prior(), Some((2022, 2022)));
        assert_eq!(YearWindows::new(2023, 2024, 2).prior(), None);
    }

    #[test]
    fn test_windows_at_integer_limits() {
        let w = YearWindows::new(i32::MIN, i32::MIN, 2);
        assert_eq!(w.recent(), (i32::MIN, i32::MIN));
        assert!(w.is_recent(i32::MIN));
        assert_eq!(w.prior(), None);

        let wide = YearWindows::new(2015, 2024, u32::MAX);
        let (from, to) = wide.recent();
        assert!(from <= to);
        assert!(wide.is_recent(2015));
        assert_eq!(wide.prior(), None);
    }

    #[test]
    fn test_implausible_years_are_undated() {
        let mut records: Vec<EvidenceRecord> = (2015..=2024)
            .flat_map(|year| (0..10).map(move |i| EvidenceRecord::new(year * 100 + i).with_year(year)))
            .collect();
        records.push(EvidenceRecord::new(1).with_year(2_000_000_000).with_text("stray"));
        records.push(EvidenceRecord::new(2).with_year(i32::MIN));

        let m = extract_metrics(&records, &config(100)).unwrap();
        assert_eq!(m.analyzed_records, 100);
        assert_eq!(m.undated_records, 1);
        assert_eq!(m.skipped_records, 1);
        assert_eq!((m.first_year, m.last_year), (2015, 2024));
        assert_eq!(m.velocity_by_year.len(), 10);
    }

    #[test]
    fn test_insufficient_dated_records() {
        let records: Vec<EvidenceRecord> = (0..50)
            .map(|i| EvidenceRecord::new(i).with_year(2020).with_text("sample"))
            .collect();

        match extract_metrics(&records, &config(100)) {
            Err(HypeCycleError::InsufficientData {
                usable, required, ..
            }) => {
                assert_eq!(usable, 50);
                assert_eq!(required, 100);
            }
            other => panic!("Expected InsufficientData, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_collection_is_insufficient() {
        assert!(matches!(
            extract_metrics(&[], &config(1)),
            Err(HypeCycleError::InsufficientData { usable: 0, .. })
        ));
    }

    #[test]
    fn test_record_accounting() {
        let mut records = vec![
            EvidenceRecord::new(1)
                .with_year(2020)
                .with_text("Commercial production process")
                .with_venue(VenueKind::Industry),
            EvidenceRecord::new(2)
                .with_year(2021)
                .with_engagement(4)
                .with_source(SourceKind::News),
            // Undated with text: counted, excluded from text stats by default.
            EvidenceRecord::new(3).with_text("Molecular mechanism"),
            // Malformed: no date, no text.
            EvidenceRecord::new(4),
        ];
        records.push(EvidenceRecord::new(5).with_year(2021).with_text("   "));

        let m = extract_metrics(&records, &config(3)).unwrap();
        assert_eq!(m.total_records, 5);
        assert_eq!(m.analyzed_records, 3);
        assert_eq!(m.undated_records, 1);
        assert_eq!(m.skipped_records, 1);
        assert_eq!(m.records_with_text, 2);
        assert_eq!(m.records_with_engagement, 1);
        assert_eq!(m.coverage_pct, 40.0);
        assert_eq!(m.classified_records, 1);
        // Dated records without text are in neither research count.
        assert_eq!(m.unclassified_records, 0);
        assert_eq!(m.applied_pct, 100.0);
        assert_eq!(m.known_venue_records, 1);
        assert_eq!(m.source_counts.get(&SourceKind::News), Some(&1));
        assert_eq!(m.source_counts.get(&SourceKind::Paper), Some(&3));
    }

    #[test]
    fn test_undated_text_stats_when_allowed() {
        let records = vec![
            EvidenceRecord::new(1).with_year(2020).with_text("Commercial product"),
            EvidenceRecord::new(2).with_text("Molecular mechanism"),
        ];
        let config = AnalysisConfig {
            min_records: 1,
            allow_undated_text_stats: true,
            ..AnalysisConfig::default()
        };

        let m = extract_metrics(&records, &config).unwrap();
        assert_eq!(m.analyzed_records, 1);
        assert_eq!(m.classified_records, 2);
        assert_eq!(m.basic_pct, 50.0);
        assert_eq!(m.velocity_by_year.values().sum::<usize>(), 1);
    }
}
