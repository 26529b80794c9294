use serde::Serialize;

use crate::config::{DashboardConfig, Labels, ResolvedFont};
use crate::models::{DailyRecord, Metric, Mood, Summary, TrendDirection};
use crate::stats;

const SLEEP_BASELINE: f64 = 6.0;
const SLEEP_RECOMMENDED: f64 = 7.0;
const SLEEP_DEFICIT: f64 = 6.0;
const STUDY_BASELINE: f64 = 4.0;
const GOOD_RATIO_BASELINE: f64 = 50.0;
const STUDY_TIERS: [(f64, &str); 2] = [(5.0, "high"), (3.0, "medium")];
const MAX_BAR_ANNOTATIONS: usize = 5;
const ANNOTATE_ALL_LIMIT: usize = 15;

/// Color palette handed to the rendering surface alongside the numbers.
#[derive(Debug, Clone, Serialize)]
pub struct Theme {
    pub donut: [&'static str; 3],
    pub tier_high: &'static str,
    pub tier_medium: &'static str,
    pub tier_low: &'static str,
    pub trend_line: &'static str,
    pub positive_delta: &'static str,
    pub negative_delta: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            donut: ["#FF9AA2", "#B5EAD7", "#A8E6CF"],
            tier_high: "#32CD32",
            tier_medium: "#FFD700",
            tier_low: "#FF6B6B",
            trend_line: "#FF1493",
            positive_delta: "#0066CC",
            negative_delta: "#FF3333",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DonutSlice {
    pub label: String,
    pub count: usize,
    pub percent: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTicks {
    pub positions: Vec<usize>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendChart {
    pub title: String,
    pub values: Vec<f64>,
    pub fitted_line: Vec<f64>,
    pub direction: TrendDirection,
    pub reference_lines: Vec<ReferenceLine>,
    /// True where the value sits below the deficit threshold.
    pub deficit_mask: Vec<bool>,
    pub ticks: AxisTicks,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub title: String,
    pub values: Vec<f64>,
    pub bar_colors: Vec<&'static str>,
    pub reference_lines: Vec<ReferenceLine>,
    /// Bars to annotate with their value: all of them on short windows,
    /// only the tallest five on crowded ones.
    pub annotate_indices: Vec<usize>,
    pub ticks: AxisTicks,
}

#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    pub title: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// metrics x days, rows in `row_labels` order.
    pub matrix: Vec<Vec<f64>>,
    pub cell_decimals: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub delta: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsEntry {
    pub label: String,
    pub value: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestDayNote {
    pub metric: String,
    pub hours: f64,
    pub mood: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodActivityChart {
    pub moods: Vec<String>,
    pub sleep_means: Vec<f64>,
    pub study_means: Vec<f64>,
    pub exercise_means: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimalCombination {
    pub sleep: f64,
    pub study: f64,
    pub exercise: f64,
}

/// Everything the rendering surface needs for one dashboard pass: numbers,
/// labels, color keys, and text. No pixels, no widget state.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan {
    pub title: String,
    pub layout: crate::config::Layout,
    pub locale: crate::config::Locale,
    pub font: ResolvedFont,
    pub warnings: Vec<String>,
    pub period: String,
    pub mood_donut_title: String,
    pub mood_donut: Vec<DonutSlice>,
    pub mood_verdict: String,
    pub sleep_chart: TrendChart,
    pub study_chart: BarChart,
    pub heatmap: Heatmap,
    pub best_days: Vec<BestDayNote>,
    pub exercise_gap: Option<String>,
    pub cards: Vec<MetricCard>,
    pub totals: Vec<TotalsEntry>,
    pub mood_activity: MoodActivityChart,
    pub insights: Vec<String>,
    pub optimal: Option<OptimalCombination>,
    pub priorities: Vec<String>,
    pub recommendations: Vec<String>,
    pub theme: Theme,
}

pub fn build_render_plan(
    records: &[DailyRecord],
    summary: &Summary,
    config: &DashboardConfig,
) -> RenderPlan {
    let labels = config.labels();
    let theme = Theme::default();
    let window = stats::trailing_window(records, config.window_size);
    let font = config.font.resolve();

    let mut warnings = Vec::new();
    if let Some(warning) = &font.warning {
        warnings.push(warning.clone());
    }

    RenderPlan {
        title: config.title.clone(),
        layout: config.layout,
        locale: config.locale,
        font,
        warnings,
        period: format!(
            "{} ~ {} ({})",
            summary.first_date,
            summary.last_date,
            (labels.days_count)(summary.total_days)
        ),
        mood_donut_title: labels.donut_title.to_string(),
        mood_donut: mood_donut(summary, labels, &theme),
        mood_verdict: mood_verdict(summary, labels).to_string(),
        sleep_chart: sleep_chart(window, summary, labels),
        study_chart: study_chart(window, labels, &theme),
        heatmap: heatmap(window, labels),
        best_days: best_days(summary, labels),
        exercise_gap: exercise_gap(summary, labels),
        cards: metric_cards(summary, labels),
        totals: totals(summary, labels),
        mood_activity: mood_activity(records, labels),
        insights: insights(summary, labels),
        optimal: optimal_combination(summary),
        priorities: priorities(summary, labels),
        recommendations: vec![
            labels.recommendation_sleep.to_string(),
            labels.recommendation_exercise.to_string(),
            labels.recommendation_study.to_string(),
        ],
        theme,
    }
}

fn mood_donut(summary: &Summary, labels: &Labels, theme: &Theme) -> Vec<DonutSlice> {
    let mut slices = vec![
        (labels.mood_good, summary.good_mood),
        (labels.mood_normal, summary.normal_mood),
        (labels.mood_bad, summary.bad_mood),
    ];
    // largest slice first; absent categories are dropped like a value_counts
    slices.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    slices
        .into_iter()
        .zip(theme.donut)
        .filter(|((_, breakdown), _)| breakdown.count > 0)
        .map(|((label, breakdown), color)| DonutSlice {
            label: label.to_string(),
            count: breakdown.count,
            percent: breakdown.ratio * 100.0,
            color,
        })
        .collect()
}

fn mood_verdict<'a>(summary: &Summary, labels: &'a Labels) -> &'a str {
    let good_pct = summary.good_mood.ratio * 100.0;
    if good_pct >= 50.0 {
        labels.verdict_positive
    } else if good_pct >= 30.0 {
        labels.verdict_improvable
    } else {
        labels.verdict_alert
    }
}

fn axis_ticks(len: usize, labels: &Labels) -> AxisTicks {
    let positions = stats::axis_tick_positions(len);
    let tick_labels = if len >= 30 {
        positions.iter().map(|&p| (labels.day_tick)(p + 1)).collect()
    } else if len >= 10 {
        vec![
            labels.tick_start.to_string(),
            labels.tick_middle.to_string(),
            labels.tick_recent.to_string(),
        ]
    } else {
        positions.iter().map(|&p| (labels.day_tick)(p + 1)).collect()
    };
    AxisTicks {
        positions,
        labels: tick_labels,
    }
}

fn sleep_chart(window: &[DailyRecord], summary: &Summary, labels: &Labels) -> TrendChart {
    let values: Vec<f64> = window.iter().map(|r| r.sleep_hours).collect();
    let trend = summary.sleep_trend;
    let fitted_line = (0..values.len())
        .map(|i| trend.slope * i as f64 + trend.intercept)
        .collect();

    TrendChart {
        title: labels.sleep_chart_title.to_string(),
        deficit_mask: values.iter().map(|&v| v < SLEEP_DEFICIT).collect(),
        fitted_line,
        direction: trend.direction,
        reference_lines: vec![ReferenceLine {
            label: format!("{}{}", SLEEP_RECOMMENDED, labels.hours_suffix),
            value: SLEEP_RECOMMENDED,
        }],
        ticks: axis_ticks(values.len(), labels),
        values,
    }
}

fn study_chart(window: &[DailyRecord], labels: &Labels, theme: &Theme) -> BarChart {
    let values: Vec<f64> = window.iter().map(|r| r.study_hours).collect();
    let bar_colors = values
        .iter()
        .map(|&v| match stats::bucket_label(v, &STUDY_TIERS, "low") {
            "high" => theme.tier_high,
            "medium" => theme.tier_medium,
            _ => theme.tier_low,
        })
        .collect();

    let window_mean = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };

    let annotate_indices = if values.len() <= ANNOTATE_ALL_LIMIT {
        (0..values.len()).collect()
    } else {
        stats::top_value_indices(&values, MAX_BAR_ANNOTATIONS)
    };

    BarChart {
        title: labels.study_chart_title.to_string(),
        bar_colors,
        reference_lines: vec![
            ReferenceLine {
                label: format!("{:.1}{}", window_mean, labels.hours_suffix),
                value: window_mean,
            },
            ReferenceLine {
                label: format!("{}{}", STUDY_BASELINE, labels.hours_suffix),
                value: STUDY_BASELINE,
            },
        ],
        annotate_indices,
        ticks: axis_ticks(values.len(), labels),
        values,
    }
}

fn heatmap(window: &[DailyRecord], labels: &Labels) -> Heatmap {
    Heatmap {
        title: labels.heatmap_title.to_string(),
        row_labels: Metric::ALL.iter().map(|&m| labels.metric(m).to_string()).collect(),
        col_labels: (1..=window.len()).map(|d| (labels.day_tick)(d)).collect(),
        matrix: Metric::ALL
            .iter()
            .map(|&m| window.iter().map(|r| r.metric(m)).collect())
            .collect(),
        cell_decimals: 0,
    }
}

fn best_days(summary: &Summary, labels: &Labels) -> Vec<BestDayNote> {
    Metric::ALL
        .iter()
        .filter(|&&m| !(m == Metric::Exercise && summary.best_day(m).metric(m) == 0.0))
        .map(|&m| {
            let record = summary.best_day(m);
            BestDayNote {
                metric: labels.metric(m).to_string(),
                hours: record.metric(m),
                mood: mood_label(&record.mood, labels),
                date: record.date.to_string(),
            }
        })
        .collect()
}

fn exercise_gap(summary: &Summary, labels: &Labels) -> Option<String> {
    if summary.best_exercise_day.exercise_hours == 0.0 {
        Some(labels.needs_exercise.to_string())
    } else {
        None
    }
}

fn mood_label(mood: &Mood, labels: &Labels) -> String {
    match mood {
        Mood::Good => labels.mood_good.to_string(),
        Mood::Normal => labels.mood_normal.to_string(),
        Mood::Bad => labels.mood_bad.to_string(),
        Mood::Other(other) => other.clone(),
    }
}

fn metric_cards(summary: &Summary, labels: &Labels) -> Vec<MetricCard> {
    let h = labels.hours_suffix;
    let sleep_delta = summary.sleep.mean - SLEEP_BASELINE;
    let study_delta = summary.study.mean - STUDY_BASELINE;
    let good_pct = summary.good_mood.ratio * 100.0;
    let mood_delta = good_pct - GOOD_RATIO_BASELINE;

    vec![
        MetricCard {
            title: labels.card_avg_sleep.to_string(),
            value: format!("{:.1}{h}", summary.sleep.mean),
            delta: format!("{}: {:+.1}{h}", labels.vs_baseline, sleep_delta),
            tone: if sleep_delta >= 0.0 { Tone::Positive } else { Tone::Negative },
        },
        MetricCard {
            title: labels.card_avg_study.to_string(),
            value: format!("{:.1}{h}", summary.study.mean),
            delta: format!("{}: {:+.1}{h}", labels.vs_baseline, study_delta),
            tone: if study_delta >= 0.0 { Tone::Positive } else { Tone::Negative },
        },
        MetricCard {
            title: labels.card_total_exercise.to_string(),
            value: format!("{:.1}{h}", summary.exercise.sum),
            delta: labels.needs_exercise.to_string(),
            tone: if summary.exercise.sum > 0.0 { Tone::Neutral } else { Tone::Negative },
        },
        MetricCard {
            title: labels.card_good_ratio.to_string(),
            value: format!("{:.0}%", good_pct),
            delta: format!("{}: {:+.0}%", labels.vs_baseline, mood_delta),
            tone: if mood_delta >= 0.0 { Tone::Positive } else { Tone::Negative },
        },
    ]
}

fn totals(summary: &Summary, labels: &Labels) -> Vec<TotalsEntry> {
    let h = labels.hours_suffix;
    let mut entries = vec![TotalsEntry {
        label: labels.period_label.to_string(),
        value: (labels.days_count)(summary.total_days),
        detail: format!("{} ~ {}", summary.first_date, summary.last_date),
    }];
    for metric in Metric::ALL {
        let stats = summary.stats(metric);
        entries.push(TotalsEntry {
            label: labels.metric(metric).to_string(),
            value: format!("{:.0}{h}", stats.sum),
            detail: format!("{:.1}{h} {}", stats.mean, labels.per_day),
        });
    }
    entries
}

fn mood_activity(records: &[DailyRecord], labels: &Labels) -> MoodActivityChart {
    let moods = [Mood::Good, Mood::Normal, Mood::Bad];
    let present: Vec<&Mood> = moods
        .iter()
        .filter(|mood| records.iter().any(|r| &r.mood == *mood))
        .collect();

    MoodActivityChart {
        moods: present.iter().map(|m| mood_label(m, labels)).collect(),
        sleep_means: present
            .iter()
            .map(|m| stats::mood_conditioned_mean(records, m, Metric::Sleep))
            .collect(),
        study_means: present
            .iter()
            .map(|m| stats::mood_conditioned_mean(records, m, Metric::Study))
            .collect(),
        exercise_means: present
            .iter()
            .map(|m| stats::mood_conditioned_mean(records, m, Metric::Exercise))
            .collect(),
    }
}

fn insights(summary: &Summary, labels: &Labels) -> Vec<String> {
    let h = labels.hours_suffix;
    let mut lines = Vec::new();

    let good_sleep = summary.good_mood_means[0];
    let bad_sleep = summary.bad_mood_means[0];
    if good_sleep > bad_sleep {
        lines.push(format!(
            "{}: {:.1}{h} ({})",
            labels.insight_sleep_link, good_sleep, labels.mood_good
        ));
    } else {
        lines.push(labels.insight_sleep_warn.to_string());
    }

    let good_exercise = summary.good_mood_means[2];
    let bad_exercise = summary.bad_mood_means[2];
    if good_exercise > bad_exercise {
        lines.push(format!(
            "{}: {:.1}{h} ({})",
            labels.insight_exercise_link, good_exercise, labels.mood_good
        ));
    } else {
        lines.push(labels.insight_exercise_hint.to_string());
    }

    lines
}

fn optimal_combination(summary: &Summary) -> Option<OptimalCombination> {
    if summary.good_mood.count == 0 {
        return None;
    }
    Some(OptimalCombination {
        sleep: summary.good_mood_means[0],
        study: summary.good_mood_means[1],
        exercise: summary.good_mood_means[2],
    })
}

fn priorities(summary: &Summary, labels: &Labels) -> Vec<String> {
    let mut list = Vec::new();
    if summary.sleep.mean < SLEEP_RECOMMENDED {
        list.push(labels.priority_sleep.to_string());
    }
    if summary.exercise.mean < 1.0 {
        list.push(labels.priority_exercise.to_string());
    }
    if summary.good_mood.ratio * 100.0 < GOOD_RATIO_BASELINE {
        list.push(labels.priority_stress.to_string());
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DashboardConfig, Locale};
    use crate::ingest::sample_records;
    use crate::stats::compute_summary;

    fn plan_for(locale: Locale) -> RenderPlan {
        let records = sample_records();
        let summary = compute_summary(&records, 30).unwrap();
        let config = DashboardConfig {
            locale,
            ..DashboardConfig::default()
        };
        build_render_plan(&records, &summary, &config)
    }

    #[test]
    fn donut_percents_cover_all_records() {
        let plan = plan_for(Locale::En);
        let total: f64 = plan.mood_donut.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        // slices ordered largest first
        assert!(plan.mood_donut[0].count >= plan.mood_donut[1].count);
    }

    #[test]
    fn heatmap_is_three_by_window_len() {
        let plan = plan_for(Locale::En);
        assert_eq!(plan.heatmap.matrix.len(), 3);
        assert_eq!(plan.heatmap.matrix[0].len(), 14);
        assert_eq!(plan.heatmap.col_labels.len(), 14);
    }

    #[test]
    fn study_bars_are_tier_colored() {
        let plan = plan_for(Locale::En);
        let theme = Theme::default();
        for (value, color) in plan.study_chart.values.iter().zip(&plan.study_chart.bar_colors) {
            if *value >= 5.0 {
                assert_eq!(*color, theme.tier_high);
            } else if *value >= 3.0 {
                assert_eq!(*color, theme.tier_medium);
            } else {
                assert_eq!(*color, theme.tier_low);
            }
        }
    }

    #[test]
    fn short_window_annotates_every_bar() {
        let plan = plan_for(Locale::En);
        assert_eq!(plan.study_chart.annotate_indices.len(), plan.study_chart.values.len());
    }

    #[test]
    fn fitted_line_matches_slope_sign() {
        let plan = plan_for(Locale::En);
        let line = &plan.sleep_chart.fitted_line;
        assert_eq!(line.len(), plan.sleep_chart.values.len());
        match plan.sleep_chart.direction {
            TrendDirection::Increasing => assert!(line[line.len() - 1] > line[0]),
            TrendDirection::Decreasing => assert!(line[line.len() - 1] < line[0]),
            TrendDirection::Flat => assert!((line[line.len() - 1] - line[0]).abs() < 1e-9),
        }
    }

    #[test]
    fn korean_locale_changes_labels_not_numbers() {
        let en = plan_for(Locale::En);
        let ko = plan_for(Locale::Ko);
        // the percent card formats identically in both locales
        assert_eq!(en.cards[3].value, ko.cards[3].value);
        assert_eq!(en.heatmap.matrix, ko.heatmap.matrix);
        assert_eq!(ko.heatmap.row_labels[0], "수면시간");
        assert_eq!(en.heatmap.row_labels[0], "Sleep");
    }

    #[test]
    fn cards_format_hours_and_percent() {
        let plan = plan_for(Locale::En);
        assert!(plan.cards[0].value.ends_with('h'));
        assert!(plan.cards[3].value.ends_with('%'));
    }

    #[test]
    fn optimal_combination_requires_good_days() {
        let plan = plan_for(Locale::En);
        assert!(plan.optimal.is_some());

        let records: Vec<_> = sample_records()
            .into_iter()
            .map(|mut r| {
                r.mood = Mood::Bad;
                r
            })
            .collect();
        let summary = compute_summary(&records, 30).unwrap();
        let plan = build_render_plan(&records, &summary, &DashboardConfig::default());
        assert!(plan.optimal.is_none());
    }
}
