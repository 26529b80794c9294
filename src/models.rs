use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mood label attached to a daily record. Labels outside the three known
/// categories parse to `Other` and are excluded from named-category counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Good,
    Normal,
    Bad,
    Other(String),
}

impl Mood {
    pub fn parse(label: &str) -> Mood {
        match label.trim() {
            "Good" | "good" | "좋음" => Mood::Good,
            "Normal" | "normal" | "보통" => Mood::Normal,
            "Bad" | "bad" | "나쁨" => Mood::Bad,
            other => Mood::Other(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Mood::Other(_))
    }
}

/// Selector for the three tracked hour metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Sleep,
    Study,
    Exercise,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Sleep, Metric::Study, Metric::Exercise];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub sleep_hours: f64,
    pub study_hours: f64,
    pub exercise_hours: f64,
    pub mood: Mood,
}

impl DailyRecord {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sleep => self.sleep_hours,
            Metric::Study => self.study_hours,
            Metric::Exercise => self.exercise_hours,
        }
    }
}

/// Mean and sum of one metric over a record set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricStats {
    pub mean: f64,
    pub sum: f64,
}

/// Count of one mood category and its fraction of all records, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodBreakdown {
    pub count: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
}

/// Least-squares fit of a metric over the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricTrend {
    pub slope: f64,
    pub intercept: f64,
    pub direction: TrendDirection,
}

/// Immutable snapshot derived from one record set. Built once per load,
/// everything downstream (report, render plan) reads from it.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_days: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub sleep: MetricStats,
    pub study: MetricStats,
    pub exercise: MetricStats,
    pub good_mood: MoodBreakdown,
    pub normal_mood: MoodBreakdown,
    pub bad_mood: MoodBreakdown,
    pub sleep_trend: MetricTrend,
    pub study_trend: MetricTrend,
    pub exercise_trend: MetricTrend,
    pub best_sleep_day: DailyRecord,
    pub best_study_day: DailyRecord,
    pub best_exercise_day: DailyRecord,
    /// Mean of each metric over good-mood days only; zeros when none exist.
    pub good_mood_means: [f64; 3],
    /// Mean of each metric over bad-mood days only; zeros when none exist.
    pub bad_mood_means: [f64; 3],
}

impl Summary {
    pub fn stats(&self, metric: Metric) -> MetricStats {
        match metric {
            Metric::Sleep => self.sleep,
            Metric::Study => self.study,
            Metric::Exercise => self.exercise,
        }
    }

    pub fn trend(&self, metric: Metric) -> MetricTrend {
        match metric {
            Metric::Sleep => self.sleep_trend,
            Metric::Study => self.study_trend,
            Metric::Exercise => self.exercise_trend,
        }
    }

    pub fn best_day(&self, metric: Metric) -> &DailyRecord {
        match metric {
            Metric::Sleep => &self.best_sleep_day,
            Metric::Study => &self.best_study_day,
            Metric::Exercise => &self.best_exercise_day,
        }
    }
}
