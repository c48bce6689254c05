use hypecycle_common::config::AnalysisConfig;
use hypecycle_common::types::ResearchTrend;

use super::keywords::Lexicon;

/// Research orientation of a single record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ResearchClass {
    Basic,
    Applied,
    /// Matches both lexicons.
    Mixed,
    /// Matches neither lexicon.
    Unclassified,
}

pub(crate) struct ResearchClassifier {
    basic: Lexicon,
    applied: Lexicon,
    enabled: bool,
}

impl ResearchClassifier {
    pub(crate) fn new(config: &AnalysisConfig) -> Self {
        Self {
            basic: Lexicon::new(&config.basic_keywords),
            applied: Lexicon::new(&config.applied_keywords),
            enabled: config.classify_research_type,
        }
    }

    pub(crate) fn classify(&self, tokens: &[String]) -> ResearchClass {
        if !self.enabled {
            return ResearchClass::Unclassified;
        }

        let basic = self.basic.count_matches(tokens);
        let applied = self.applied.count_matches(tokens);

        match (basic > 0, applied > 0) {
            (true, true) => ResearchClass::Mixed,
            (true, false) => ResearchClass::Basic,
            (false, true) => ResearchClass::Applied,
            (false, false) => ResearchClass::Unclassified,
        }
    }
}

pub(crate) struct ResearchStats {
    pub classified_records: usize,
    pub unclassified_records: usize,
    pub basic_pct: f64,
    pub applied_pct: f64,
    pub mixed_pct: f64,
    pub research_trend: ResearchTrend,
}

/// Where a classified record sits in time relative to the recent window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Period {
    Recent,
    Earlier,
    Undated,
}

#[derive(Default, Clone, Copy)]
struct AppliedShare {
    applied: usize,
    classified: usize,
}

impl AppliedShare {
    fn pct(&self) -> Option<f64> {
        (self.classified > 0).then(|| self.applied as f64 / self.classified as f64 * 100.0)
    }
}

#[derive(Default)]
pub(crate) struct ResearchTally {
    basic: usize,
    applied: usize,
    mixed: usize,
    unclassified: usize,
    recent: AppliedShare,
    earlier: AppliedShare,
}

impl ResearchTally {
    pub(crate) fn observe(&mut self, class: ResearchClass, period: Period) {
        match class {
            ResearchClass::Basic => self.basic += 1,
            ResearchClass::Applied => self.applied += 1,
            ResearchClass::Mixed => self.mixed += 1,
            ResearchClass::Unclassified => {
                self.unclassified += 1;
                return;
            }
        }

        let share = match period {
            Period::Recent => &mut self.recent,
            Period::Earlier => &mut self.earlier,
            Period::Undated => return,
        };
        share.classified += 1;
        if class == ResearchClass::Applied {
            share.applied += 1;
        }
    }

    /// Percentages are over the classified subset only; unclassified
    /// records are reported separately.
    pub(crate) fn finish(self, trend_threshold: f64) -> ResearchStats {
        let classified = self.basic + self.applied + self.mixed;
        let pct = |n: usize| {
            if classified == 0 {
                0.0
            } else {
                n as f64 / classified as f64 * 100.0
            }
        };

        let research_trend = match (self.earlier.pct(), self.recent.pct()) {
            (Some(earlier), Some(recent)) if recent > earlier + trend_threshold => {
                ResearchTrend::TowardApplied
            }
            (Some(earlier), Some(recent)) if recent < earlier - trend_threshold => {
                ResearchTrend::TowardBasic
            }
            _ => ResearchTrend::Stable,
        };

        ResearchStats {
            classified_records: classified,
            unclassified_records: self.unclassified,
            basic_pct: pct(self.basic),
            applied_pct: pct(self.applied),
            mixed_pct: pct(self.mixed),
            research_trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::keywords::tokenize;

    #[test]
    fn test_classification_by_lexicon_overlap() {
        let classifier = ResearchClassifier::new(&AnalysisConfig::default());

        assert_eq!(
            classifier.classify(&tokenize("Molecular mechanism of signalling")),
            ResearchClass::Basic
        );
        assert_eq!(
            classifier.classify(&tokenize("Commercial production in a bioreactor")),
            ResearchClass::Applied
        );
        assert_eq!(
            classifier.classify(&tokenize("Novel pathway enables scalable manufacturing")),
            ResearchClass::Mixed
        );
        assert_eq!(
            classifier.classify(&tokenize("A survey of opinions")),
            ResearchClass::Unclassified
        );
    }

    #[test]
    fn test_disabled_classifier_classifies_nothing() {
        let config = AnalysisConfig {
            classify_research_type: false,
            ..AnalysisConfig::default()
        };
        let classifier = ResearchClassifier::new(&config);
        assert_eq!(
            classifier.classify(&tokenize("commercial product")),
            ResearchClass::Unclassified
        );
    }

    #[test]
    fn test_percentages_exclude_unclassified() {
        let mut tally = ResearchTally::default();
        tally.observe(ResearchClass::Basic, Period::Earlier);
        tally.observe(ResearchClass::Applied, Period::Recent);
        tally.observe(ResearchClass::Applied, Period::Recent);
        tally.observe(ResearchClass::Mixed, Period::Undated);
        tally.observe(ResearchClass::Unclassified, Period::Recent);
        tally.observe(ResearchClass::Unclassified, Period::Earlier);

        let stats = tally.finish(10.0);
        assert_eq!(stats.classified_records, 4);
        assert_eq!(stats.unclassified_records, 2);
        assert_eq!(stats.basic_pct, 25.0);
        assert_eq!(stats.applied_pct, 50.0);
        assert_eq!(stats.mixed_pct, 25.0);
        assert_eq!(stats.basic_pct + stats.applied_pct + stats.mixed_pct, 100.0);
        // earlier 0% applied, recent 100% applied
        assert_eq!(stats.research_trend, ResearchTrend::TowardApplied);
    }

    #[test]
    fn test_trend_needs_both_periods() {
        let mut tally = ResearchTally::default();
        tally.observe(ResearchClass::Applied, Period::Recent);
        let stats = tally.finish(10.0);
        assert_eq!(stats.research_trend, ResearchTrend::Stable);
    }
}
