use std::collections::BTreeMap;

use hypecycle_common::types::VelocityTrend;

use super::YearWindows;

/// How many trailing buckets the year-over-year deltas cover.
const DELTA_BUCKETS: usize = 4;

pub(crate) struct VelocityStats {
    pub velocity_by_year: BTreeMap<i32, usize>,
    pub peak_year: i32,
    pub peak_count: usize,
    pub avg_records_per_year: f64,
    pub recent_velocity: f64,
    pub velocity_deltas: Vec<i64>,
    pub velocity_trend: VelocityTrend,
    pub records_last_year: usize,
    pub records_last_2_years: usize,
    pub records_first_2_years: usize,
    pub growth_rate_early_vs_late: f64,
}

/// Summarize per-year record counts. `year_counts` must be non-empty and
/// span exactly `windows.first_year..=windows.last_year`.
pub(crate) fn summarize(
    year_counts: &BTreeMap<i32, usize>,
    windows: &YearWindows,
    trend_threshold: f64,
) -> VelocityStats {
    // Zero-fill gaps so window means treat silent years as zero activity.
    let velocity_by_year: BTreeMap<i32, usize> = (windows.first_year..=windows.last_year)
        .map(|y| (y, year_counts.get(&y).copied().unwrap_or(0)))
        .collect();

    let mut peak_year = windows.first_year;
    let mut peak_count = 0;
    for (&year, &count) in &velocity_by_year {
        // Strict comparison keeps the earliest year on ties.
        if count > peak_count {
            peak_year = year;
            peak_count = count;
        }
    }

    let total: usize = velocity_by_year.values().sum();
    let avg_records_per_year = total as f64 / velocity_by_year.len() as f64;

    let recent_velocity = window_mean(&velocity_by_year, Some(windows.recent())).unwrap_or(0.0);
    let prior_velocity = window_mean(&velocity_by_year, windows.prior());

    let counts: Vec<usize> = velocity_by_year.values().copied().collect();
    let tail = &counts[counts.len().saturating_sub(DELTA_BUCKETS)..];
    let velocity_deltas: Vec<i64> = tail
        .windows(2)
        .map(|w| w[1] as i64 - w[0] as i64)
        .collect();

    let velocity_trend = classify_trend(&counts, recent_velocity, prior_velocity, trend_threshold);

    let sum_years = |from: i32, to: i32| -> usize {
        velocity_by_year.range(from..=to).map(|(_, c)| *c).sum()
    };
    let records_last_year = sum_years(windows.last_year, windows.last_year);
    let records_last_2_years = sum_years(windows.last_year.saturating_sub(1), windows.last_year);
    let records_first_2_years = sum_years(windows.first_year, windows.first_year.saturating_add(1));
    let growth_rate_early_vs_late = if records_first_2_years > 0 {
        (records_last_2_years as f64 - records_first_2_years as f64) / records_first_2_years as f64
            * 100.0
    } else {
        0.0
    };

    VelocityStats {
        velocity_by_year,
        peak_year,
        peak_count,
        avg_records_per_year,
        recent_velocity,
        velocity_deltas,
        velocity_trend,
        records_last_year,
        records_last_2_years,
        records_first_2_years,
        growth_rate_early_vs_late,
    }
}

/// Mean count over the years of `range` that fall inside the series.
fn window_mean(series: &BTreeMap<i32, usize>, range: Option<(i32, i32)>) -> Option<f64> {
    let (from, to) = range?;
    let values: Vec<usize> = series.range(from..=to).map(|(_, c)| *c).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<usize>() as f64 / values.len() as f64)
}

/// Trend of the series from recent vs prior window means.
///
/// A deviation beyond `threshold` (relative) is a rise or fall. Inside the
/// band, a latest bucket strictly above every earlier bucket is a peak.
fn classify_trend(
    counts: &[usize],
    recent_mean: f64,
    prior_mean: Option<f64>,
    threshold: f64,
) -> VelocityTrend {
    let Some(prior_mean) = prior_mean else {
        return VelocityTrend::Stable;
    };

    if prior_mean == 0.0 {
        return if recent_mean > 0.0 {
            VelocityTrend::Increasing
        } else {
            VelocityTrend::Stable
        };
    }

    if recent_mean > prior_mean * (1.0 + threshold) {
        return VelocityTrend::Increasing;
    }
    if recent_mean < prior_mean * (1.0 - threshold) {
        return VelocityTrend::Decreasing;
    }

    match counts.split_last() {
        Some((latest, earlier)) if !earlier.is_empty() && earlier.iter().all(|c| latest > c) => {
            VelocityTrend::PeakReached
        }
        _ => VelocityTrend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(i32, usize)]) -> BTreeMap<i32, usize> {
        pairs.iter().copied().collect()
    }

    fn run(pairs: &[(i32, usize)]) -> VelocityStats {
        let counts = series(pairs);
        let windows = YearWindows::new(
            *counts.keys().next().unwrap(),
            *counts.keys().last().unwrap(),
            2,
        );
        summarize(&counts, &windows, 0.05)
    }

    #[test]
    fn test_gaps_are_zero_filled() {
        let stats = run(&[(2018, 5), (2021, 7)]);
        assert_eq!(
            stats.velocity_by_year,
            series(&[(2018, 5), (2019, 0), (2020, 0), (2021, 7)])
        );
        assert_eq!(stats.avg_records_per_year, 3.0);
    }

    #[test]
    fn test_increasing_and_decreasing() {
        let rising = run(&[(2019, 10), (2020, 20), (2021, 30), (2022, 40)]);
        assert_eq!(rising.velocity_trend, VelocityTrend::Increasing);
        assert_eq!(rising.recent_velocity, 35.0);
        assert_eq!(rising.velocity_deltas, vec![10, 10, 10]);
        assert_eq!(rising.peak_year, 2022);

        let falling = run(&[(2019, 40), (2020, 30), (2021, 20), (2022, 10)]);
        assert_eq!(falling.velocity_trend, VelocityTrend::Decreasing);
        assert_eq!(falling.peak_year, 2019);
    }

    #[test]
    fn test_flat_series_is_stable_not_peak() {
        let stats = run(&[(2019, 50), (2020, 50), (2021, 50), (2022, 50)]);
        assert_eq!(stats.velocity_trend, VelocityTrend::Stable);
        // Earliest year wins the peak tie.
        assert_eq!(stats.peak_year, 2019);
        assert_eq!(stats.peak_count, 50);
    }

    #[test]
    fn test_peak_reached_inside_threshold_band() {
        // Means 100.0 vs 100.5 are within 5%, but the latest year is a new high.
        let stats = run(&[(2019, 100), (2020, 100), (2021, 98), (2022, 103)]);
        assert_eq!(stats.velocity_trend, VelocityTrend::PeakReached);
    }

    #[test]
    fn test_single_year_has_no_prior_window() {
        let stats = run(&[(2022, 120)]);
        assert_eq!(stats.velocity_trend, VelocityTrend::Stable);
        assert!(stats.velocity_deltas.is_empty());
        assert_eq!(stats.records_last_2_years, 120);
        assert_eq!(stats.growth_rate_early_vs_late, 0.0);
    }

    #[test]
    fn test_early_vs_late_growth() {
        let stats = run(&[(2015, 10), (2016, 10), (2017, 15), (2018, 30), (2019, 30)]);
        assert_eq!(stats.records_first_2_years, 20);
        assert_eq!(stats.records_last_2_years, 60);
        assert_eq!(stats.growth_rate_early_vs_late, 200.0);
        assert_eq!(stats.records_last_year, 30);
    }
}
