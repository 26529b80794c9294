use crate::ingest::DataError;
use crate::models::{
    DailyRecord, Metric, MetricStats, MetricTrend, Mood, MoodBreakdown, Summary, TrendDirection,
};

/// Builds the full summary snapshot: whole-period means and mood mix, plus
/// trends and best days over the trailing window.
pub fn compute_summary(records: &[DailyRecord], window_size: usize) -> Result<Summary, DataError> {
    if records.is_empty() {
        return Err(DataError::NoData);
    }

    let window = trailing_window(records, window_size);

    let sleep = metric_stats(records, Metric::Sleep);
    let study = metric_stats(records, Metric::Study);
    let exercise = metric_stats(records, Metric::Exercise);

    let good_mood_means = mood_means(records, &Mood::Good);
    let bad_mood_means = mood_means(records, &Mood::Bad);

    Ok(Summary {
        total_days: records.len(),
        first_date: records[0].date,
        last_date: records[records.len() - 1].date,
        sleep,
        study,
        exercise,
        good_mood: mood_breakdown(records, &Mood::Good),
        normal_mood: mood_breakdown(records, &Mood::Normal),
        bad_mood: mood_breakdown(records, &Mood::Bad),
        sleep_trend: metric_trend(window, Metric::Sleep),
        study_trend: metric_trend(window, Metric::Study),
        exercise_trend: metric_trend(window, Metric::Exercise),
        best_sleep_day: best_day(window, Metric::Sleep)?.clone(),
        best_study_day: best_day(window, Metric::Study)?.clone(),
        best_exercise_day: best_day(window, Metric::Exercise)?.clone(),
        good_mood_means,
        bad_mood_means,
    })
}

/// Mean and sum of one metric over all records. Callers guarantee the slice
/// is non-empty; on an empty slice both fields are 0.
pub fn metric_stats(records: &[DailyRecord], metric: Metric) -> MetricStats {
    let sum: f64 = records.iter().map(|r| r.metric(metric)).sum();
    let mean = if records.is_empty() {
        0.0
    } else {
        sum / records.len() as f64
    };
    MetricStats { mean, sum }
}

/// Count and ratio of one mood category. The ratio denominator is the full
/// record count, so unrecognized labels dilute every named category.
pub fn mood_breakdown(records: &[DailyRecord], mood: &Mood) -> MoodBreakdown {
    let count = records.iter().filter(|r| &r.mood == mood).count();
    let ratio = if records.is_empty() {
        0.0
    } else {
        count as f64 / records.len() as f64
    };
    MoodBreakdown { count, ratio }
}

/// The last `min(max_size, len)` records, original order preserved.
pub fn trailing_window(records: &[DailyRecord], max_size: usize) -> &[DailyRecord] {
    let start = records.len().saturating_sub(max_size);
    &records[start..]
}

/// Ordinary least-squares slope of `values` against indices `0..n-1`.
/// Fewer than two points has no defined trend; slope 0 by convention.
pub fn linear_trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        numerator += (x - x_mean) * (y - y_mean);
        denominator += (x - x_mean).powi(2);
    }

    numerator / denominator
}

/// Exact sign test on the slope. Zero means flat; no epsilon band, so with
/// noisy data the flat branch is nearly unreachable. Kept for compatibility
/// with the displayed trend arrows.
pub fn classify_trend(slope: f64) -> TrendDirection {
    if slope > 0.0 {
        TrendDirection::Increasing
    } else if slope < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Flat
    }
}

pub fn metric_trend(records: &[DailyRecord], metric: Metric) -> MetricTrend {
    let values: Vec<f64> = records.iter().map(|r| r.metric(metric)).collect();
    let slope = linear_trend(&values);
    let mean = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };
    // intercept chosen so the fitted line passes through the centroid
    let intercept = mean - slope * (values.len() as f64 - 1.0) / 2.0;
    MetricTrend {
        slope,
        intercept,
        direction: classify_trend(slope),
    }
}

/// Record with the maximum value of `metric`. Stable: ties keep the first
/// occurrence in sequence order.
pub fn best_day(records: &[DailyRecord], metric: Metric) -> Result<&DailyRecord, DataError> {
    let mut best: Option<&DailyRecord> = None;
    for record in records {
        if best.map_or(true, |b| record.metric(metric) > b.metric(metric)) {
            best = Some(record);
        }
    }
    best.ok_or(DataError::NoData)
}

/// Mean of `metric` over records whose mood matches. No matching record
/// yields 0, never a division by zero.
pub fn mood_conditioned_mean(records: &[DailyRecord], mood: &Mood, metric: Metric) -> f64 {
    let matching: Vec<f64> = records
        .iter()
        .filter(|r| &r.mood == mood)
        .map(|r| r.metric(metric))
        .collect();
    if matching.is_empty() {
        0.0
    } else {
        matching.iter().sum::<f64>() / matching.len() as f64
    }
}

fn mood_means(records: &[DailyRecord], mood: &Mood) -> [f64; 3] {
    [
        mood_conditioned_mean(records, mood, Metric::Sleep),
        mood_conditioned_mean(records, mood, Metric::Study),
        mood_conditioned_mean(records, mood, Metric::Exercise),
    ]
}

/// First tier whose threshold the value meets or exceeds wins. Tiers are
/// ordered descending by threshold; the fallback is the lowest tier.
pub fn bucket_label<'a>(value: f64, tiers: &[(f64, &'a str)], fallback: &'a str) -> &'a str {
    for &(threshold, label) in tiers {
        if value >= threshold {
            return label;
        }
    }
    fallback
}

/// Axis tick positions for a window of `len` records: 30+ days get four fixed
/// day markers, 10+ get start/middle/end, short windows get one tick per day.
pub fn axis_tick_positions(len: usize) -> Vec<usize> {
    if len >= 30 {
        vec![0, 9, 19, 29]
    } else if len >= 10 {
        vec![0, len / 2, len - 1]
    } else {
        (0..len).collect()
    }
}

/// Indices of the `k` largest values, used to annotate only the tallest bars
/// on crowded charts. Stable: equal values keep sequence order.
pub fn top_value_indices(values: &[f64], k: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut top: Vec<usize> = indexed.into_iter().take(k).map(|(i, _)| i).collect();
    top.sort_unstable();
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(ordinal: u32, sleep: f64, study: f64, exercise: f64, mood: Mood) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, ordinal).unwrap(),
            sleep_hours: sleep,
            study_hours: study,
            exercise_hours: exercise,
            mood,
        }
    }

    fn sample_records() -> Vec<DailyRecord> {
        vec![
            day(1, 4.0, 5.0, 0.0, Mood::Good),
            day(2, 6.0, 3.0, 0.0, Mood::Normal),
            day(3, 5.0, 6.0, 0.0, Mood::Bad),
        ]
    }

    #[test]
    fn mean_matches_sum_over_count_and_stays_in_range() {
        let records = sample_records();
        let stats = metric_stats(&records, Metric::Sleep);
        assert!((stats.mean - stats.sum / records.len() as f64).abs() < 1e-12);
        assert!(stats.mean >= 4.0 && stats.mean <= 6.0);
    }

    #[test]
    fn mood_ratios_sum_to_one_when_all_labels_recognized() {
        let records = sample_records();
        let total = mood_breakdown(&records, &Mood::Good).ratio
            + mood_breakdown(&records, &Mood::Normal).ratio
            + mood_breakdown(&records, &Mood::Bad).ratio;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unrecognized_moods_dilute_named_ratios() {
        let mut records = sample_records();
        records.push(day(4, 7.0, 2.0, 1.0, Mood::Other("meh".to_string())));
        let good = mood_breakdown(&records, &Mood::Good);
        assert_eq!(good.count, 1);
        assert!((good.ratio - 0.25).abs() < 1e-12);
    }

    #[test]
    fn trailing_window_returns_whole_set_when_small() {
        let records = sample_records();
        let window = trailing_window(&records, 30);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].date, records[0].date);
    }

    #[test]
    fn trailing_window_keeps_most_recent_in_order() {
        let records: Vec<DailyRecord> = (1..=31)
            .map(|i| day(i, i as f64, 0.0, 0.0, Mood::Normal))
            .collect();
        let window = trailing_window(&records, 30);
        assert_eq!(window.len(), 30);
        assert_eq!(window[0].sleep_hours, 2.0);
        assert_eq!(window[29].sleep_hours, 31.0);
    }

    #[test]
    fn linear_trend_sign_matches_direction() {
        assert_eq!(classify_trend(linear_trend(&[5.0, 5.0, 5.0, 5.0])), TrendDirection::Flat);
        assert_eq!(linear_trend(&[5.0, 5.0, 5.0, 5.0]), 0.0);
        let up = linear_trend(&[1.0, 2.0, 3.0, 4.0]);
        assert!(up > 0.0);
        assert_eq!(classify_trend(up), TrendDirection::Increasing);
        let down = linear_trend(&[4.0, 3.0, 2.0, 1.0]);
        assert!(down < 0.0);
        assert_eq!(classify_trend(down), TrendDirection::Decreasing);
    }

    #[test]
    fn linear_trend_on_short_input_is_flat() {
        assert_eq!(linear_trend(&[7.0]), 0.0);
        assert_eq!(linear_trend(&[]), 0.0);
    }

    #[test]
    fn best_day_is_stable_argmax() {
        let records = sample_records();
        let best = best_day(&records, Metric::Sleep).unwrap();
        assert_eq!(best.sleep_hours, 6.0);
        assert_eq!(best.date, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());

        let tied = vec![
            day(1, 6.0, 0.0, 0.0, Mood::Good),
            day(2, 6.0, 0.0, 0.0, Mood::Bad),
        ];
        let best = best_day(&tied, Metric::Sleep).unwrap();
        assert_eq!(best.date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn best_day_on_empty_set_is_no_data() {
        assert!(matches!(best_day(&[], Metric::Sleep), Err(DataError::NoData)));
    }

    #[test]
    fn mood_conditioned_mean_without_matches_is_zero() {
        let records = vec![
            day(1, 4.0, 5.0, 0.0, Mood::Good),
            day(2, 6.0, 3.0, 0.0, Mood::Normal),
        ];
        assert_eq!(mood_conditioned_mean(&records, &Mood::Bad, Metric::Sleep), 0.0);
    }

    #[test]
    fn bucket_label_picks_first_threshold_met() {
        let tiers = [(5.0, "high"), (3.0, "medium")];
        assert_eq!(bucket_label(6.0, &tiers, "low"), "high");
        assert_eq!(bucket_label(5.0, &tiers, "low"), "high");
        assert_eq!(bucket_label(3.5, &tiers, "low"), "medium");
        assert_eq!(bucket_label(1.0, &tiers, "low"), "low");
    }

    #[test]
    fn axis_ticks_adapt_to_window_length() {
        assert_eq!(axis_tick_positions(30), vec![0, 9, 19, 29]);
        assert_eq!(axis_tick_positions(45), vec![0, 9, 19, 29]);
        assert_eq!(axis_tick_positions(11), vec![0, 5, 10]);
        assert_eq!(axis_tick_positions(4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn top_value_indices_are_stable_and_sorted() {
        let values = [2.0, 9.0, 4.0, 9.0, 1.0, 7.0];
        assert_eq!(top_value_indices(&values, 3), vec![1, 3, 5]);
    }

    #[test]
    fn summary_end_to_end_scenario() {
        let summary = compute_summary(&sample_records(), 30).unwrap();
        assert!((summary.sleep.mean - 5.0).abs() < 1e-9);
        assert!((summary.study.mean - 4.67).abs() < 0.01);
        assert_eq!(summary.exercise.sum, 0.0);
        assert!((summary.good_mood.ratio * 100.0 - 33.0).abs() < 1.0);
    }

    #[test]
    fn summary_on_empty_set_is_no_data() {
        assert!(matches!(compute_summary(&[], 30), Err(DataError::NoData)));
    }
}
