use std::fmt::Write;

use crate::config::DashboardConfig;
use crate::models::{Metric, Summary, TrendDirection};

fn direction_arrow(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Increasing => "increasing",
        TrendDirection::Decreasing => "decreasing",
        TrendDirection::Flat => "flat",
    }
}

pub fn build_report(summary: &Summary, config: &DashboardConfig) -> String {
    let labels = config.labels();
    let h = labels.hours_suffix;
    let mut output = String::new();

    let _ = writeln!(output, "# {}", config.title);
    let _ = writeln!(
        output,
        "{}: {} ~ {} ({})",
        labels.period_label,
        summary.first_date,
        summary.last_date,
        (labels.days_count)(summary.total_days)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Averages");
    for metric in Metric::ALL {
        let stats = summary.stats(metric);
        let _ = writeln!(
            output,
            "- {}: {:.1}{h} {} ({:.0}{h} total)",
            labels.metric(metric),
            stats.mean,
            labels.per_day,
            stats.sum
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", labels.donut_title);
    for (label, breakdown) in [
        (labels.mood_good, summary.good_mood),
        (labels.mood_normal, summary.normal_mood),
        (labels.mood_bad, summary.bad_mood),
    ] {
        let _ = writeln!(
            output,
            "- {}: {} ({:.1}%)",
            label,
            (labels.days_count)(breakdown.count),
            breakdown.ratio * 100.0
        );
    }
    let good_pct = summary.good_mood.ratio * 100.0;
    let verdict = if good_pct >= 50.0 {
        labels.verdict_positive
    } else if good_pct >= 30.0 {
        labels.verdict_improvable
    } else {
        labels.verdict_alert
    };
    let _ = writeln!(output);
    let _ = writeln!(output, "{verdict}");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trends");
    for metric in Metric::ALL {
        let trend = summary.trend(metric);
        let _ = writeln!(
            output,
            "- {}: {} (slope {:+.3})",
            labels.metric(metric),
            direction_arrow(trend.direction),
            trend.slope
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Best days");
    for metric in Metric::ALL {
        let best = summary.best_day(metric);
        let _ = writeln!(
            output,
            "- {}: {:.1}{h} on {}",
            labels.metric(metric),
            best.metric(metric),
            best.date
        );
    }

    if summary.good_mood.count > 0 {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Good-mood combination");
        for (label, mean) in [
            (labels.metric_sleep, summary.good_mood_means[0]),
            (labels.metric_study, summary.good_mood_means[1]),
            (labels.metric_exercise, summary.good_mood_means[2]),
        ] {
            let _ = writeln!(output, "- {label}: {mean:.1}{h}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Priorities");
    let mut priorities = Vec::new();
    if summary.sleep.mean < 7.0 {
        priorities.push(labels.priority_sleep);
    }
    if summary.exercise.mean < 1.0 {
        priorities.push(labels.priority_exercise);
    }
    if good_pct < 50.0 {
        priorities.push(labels.priority_stress);
    }
    if priorities.is_empty() {
        let _ = writeln!(output, "{}", labels.priorities_clear);
    } else {
        for (rank, priority) in priorities.iter().enumerate() {
            let _ = writeln!(output, "{}. {priority}", rank + 1);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    for recommendation in [
        labels.recommendation_sleep,
        labels.recommendation_exercise,
        labels.recommendation_study,
    ] {
        let _ = writeln!(output, "- {recommendation}");
    }

    output
}
