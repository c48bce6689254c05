use std::collections::BTreeMap;

use super::YearWindows;

pub(crate) struct CitationStats {
    pub total_citations: u64,
    pub avg_citations: f64,
    pub median_citations: f64,
    pub citation_growth_rate: f64,
    pub highly_cited_count: usize,
    pub records_with_engagement: usize,
}

#[derive(Default, Clone, Copy)]
struct YearEngagement {
    sum: u128,
    count: usize,
}

/// Running engagement aggregates over dated records.
#[derive(Default)]
pub(crate) struct EngagementTally {
    values: Vec<u64>,
    by_year: BTreeMap<i32, YearEngagement>,
    highly_cited: usize,
}

impl EngagementTally {
    /// Record one dated record's engagement. Unknown counts are not zeros
    /// and are left out of every mean.
    pub(crate) fn observe(&mut self, year: i32, engagement: Option<u64>, highly_cited_threshold: u64) {
        let Some(count) = engagement else {
            return;
        };

        self.values.push(count);
        let entry = self.by_year.entry(year).or_default();
        entry.sum += u128::from(count);
        entry.count += 1;

        if count >= highly_cited_threshold {
            self.highly_cited += 1;
        }
    }

    pub(crate) fn finish(mut self, windows: &YearWindows, growth_cap: f64) -> CitationStats {
        // Counts are unbounded, so sums are widened before they can overflow.
        let total: u128 = self.values.iter().map(|v| u128::from(*v)).sum();
        let n = self.values.len();
        let avg = if n > 0 { total as f64 / n as f64 } else { 0.0 };

        self.values.sort_unstable();
        let median = match n {
            0 => 0.0,
            _ if n % 2 == 1 => self.values[n / 2] as f64,
            _ => (self.values[n / 2 - 1] as f64 + self.values[n / 2] as f64) / 2.0,
        };

        // Without a prior window there is nothing to compare against.
        let citation_growth_rate = match windows.prior() {
            Some(prior) => growth_rate(
                self.window_mean(prior),
                self.window_mean(windows.recent()),
                growth_cap,
            ),
            None => 0.0,
        };

        CitationStats {
            total_citations: u64::try_from(total).unwrap_or(u64::MAX),
            avg_citations: avg,
            median_citations: median,
            citation_growth_rate,
            highly_cited_count: self.highly_cited,
            records_with_engagement: n,
        }
    }

    /// Mean engagement of records published in `from..=to`; zero when none
    /// report engagement.
    fn window_mean(&self, (from, to): (i32, i32)) -> f64 {
        let (sum, count) = self
            .by_year
            .range(from..=to)
            .fold((0u128, 0usize), |(s, c), (_, e)| (s + e.sum, c + e.count));
        if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        }
    }
}

/// Signed percentage change from `prior_mean` to `recent_mean`.
///
/// Zero when both means are zero. When only the prior mean is zero the
/// result is `cap`, and no result ever exceeds `cap`.
pub(crate) fn growth_rate(prior_mean: f64, recent_mean: f64, cap: f64) -> f64 {
    if prior_mean == 0.0 {
        return if recent_mean > 0.0 { cap } else { 0.0 };
    }
    ((recent_mean - prior_mean) / prior_mean * 100.0).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_rate_zero_denominators() {
        assert_eq!(growth_rate(0.0, 0.0, 1000.0), 0.0);
        assert_eq!(growth_rate(0.0, 3.5, 1000.0), 1000.0);
        assert!(growth_rate(0.0, 3.5, 1000.0).is_finite());
    }

    #[test]
    fn test_growth_rate_signed_and_capped() {
        assert_eq!(growth_rate(10.0, 15.0, 1000.0), 50.0);
        assert_eq!(growth_rate(10.0, 5.0, 1000.0), -50.0);
        assert_eq!(growth_rate(1.0, 500.0, 1000.0), 1000.0);
    }

    #[test]
    fn test_unknown_engagement_is_not_zero() {
        let windows = YearWindows::new(2019, 2022, 2);
        let mut tally = EngagementTally::default();
        tally.observe(2019, Some(10), 100);
        tally.observe(2020, None, 100);
        tally.observe(2021, Some(20), 100);
        tally.observe(2022, Some(150), 100);

        let stats = tally.finish(&windows, 1000.0);
        assert_eq!(stats.records_with_engagement, 3);
        assert_eq!(stats.total_citations, 180);
        assert_eq!(stats.avg_citations, 60.0);
        assert_eq!(stats.median_citations, 20.0);
        assert_eq!(stats.highly_cited_count, 1);
        // prior window 2019-2020 mean 10, recent 2021-2022 mean 85
        assert_eq!(stats.citation_growth_rate, 750.0);
    }

    #[test]
    fn test_even_median_and_no_prior_window() {
        let windows = YearWindows::new(2021, 2022, 2);
        let mut tally = EngagementTally::default();
        for c in [1, 2, 3, 10] {
            tally.observe(2022, Some(c), 100);
        }
        let stats = tally.finish(&windows, 1000.0);
        assert_eq!(stats.median_citations, 2.5);
        assert_eq!(stats.citation_growth_rate, 0.0);
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let windows = YearWindows::new(2019, 2022, 2);
        let mut tally = EngagementTally::default();
        for year in 2019..=2022 {
            tally.observe(year, Some(u64::MAX), 100);
            tally.observe(year, Some(u64::MAX), 100);
        }

        let stats = tally.finish(&windows, 1000.0);
        assert_eq!(stats.records_with_engagement, 8);
        assert_eq!(stats.total_citations, u64::MAX);
        assert_eq!(stats.avg_citations, u64::MAX as f64);
        assert_eq!(stats.median_citations, u64::MAX as f64);
        assert_eq!(stats.highly_cited_count, 8);
        assert_eq!(stats.citation_growth_rate, 0.0);
    }
}
