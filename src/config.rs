use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

/// Page layout requested from the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Wide,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ko,
}

/// Font settings handed to the rendering surface. The resolved font travels
/// inside the render plan; nothing mutates process-wide rendering state.
#[derive(Debug, Clone, Serialize)]
pub struct FontConfig {
    pub path: PathBuf,
    pub fallback_family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fonts/NanumGothic.ttf"),
            fallback_family: "DejaVu Sans".to_string(),
        }
    }
}

/// Outcome of the font lookup. A missing file is non-fatal: the dashboard
/// renders with the fallback family and a warning banner.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedFont {
    pub family: String,
    pub path: Option<PathBuf>,
    pub warning: Option<String>,
}

impl FontConfig {
    pub fn resolve(&self) -> ResolvedFont {
        if self.path.exists() {
            ResolvedFont {
                family: font_family_name(&self.path),
                path: Some(self.path.clone()),
                warning: None,
            }
        } else {
            warn!("font file {} not found, using fallback", self.path.display());
            ResolvedFont {
                family: self.fallback_family.clone(),
                path: None,
                warning: Some(format!(
                    "font file {} not found, falling back to {}",
                    self.path.display(),
                    self.fallback_family
                )),
            }
        }
    }
}

fn font_family_name(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sans-serif")
        .to_string()
}

/// Built once in `main` from CLI flags and passed down explicitly; nothing
/// reads ambient global state after startup.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub title: String,
    pub layout: Layout,
    pub locale: Locale,
    pub font: FontConfig,
    pub window_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Life Tracker".to_string(),
            layout: Layout::Wide,
            locale: Locale::En,
            font: FontConfig::default(),
            window_size: 30,
        }
    }
}

impl DashboardConfig {
    pub fn labels(&self) -> &'static Labels {
        Labels::for_locale(self.locale)
    }
}

/// User-facing strings for one locale. The English and Korean dashboards are
/// the same code path; only this table differs.
#[derive(Debug)]
pub struct Labels {
    pub mood_good: &'static str,
    pub mood_normal: &'static str,
    pub mood_bad: &'static str,
    pub metric_sleep: &'static str,
    pub metric_study: &'static str,
    pub metric_exercise: &'static str,
    pub hours_suffix: &'static str,
    pub day_tick: fn(usize) -> String,
    pub days_count: fn(usize) -> String,
    pub tick_start: &'static str,
    pub tick_middle: &'static str,
    pub tick_recent: &'static str,
    pub donut_title: &'static str,
    pub sleep_chart_title: &'static str,
    pub study_chart_title: &'static str,
    pub heatmap_title: &'static str,
    pub period_label: &'static str,
    pub per_day: &'static str,
    pub insight_sleep_link: &'static str,
    pub insight_sleep_warn: &'static str,
    pub insight_exercise_link: &'static str,
    pub insight_exercise_hint: &'static str,
    pub card_avg_sleep: &'static str,
    pub card_avg_study: &'static str,
    pub card_total_exercise: &'static str,
    pub card_good_ratio: &'static str,
    pub vs_baseline: &'static str,
    pub needs_exercise: &'static str,
    pub verdict_positive: &'static str,
    pub verdict_improvable: &'static str,
    pub verdict_alert: &'static str,
    pub priority_sleep: &'static str,
    pub priority_exercise: &'static str,
    pub priority_stress: &'static str,
    pub priorities_clear: &'static str,
    pub recommendation_sleep: &'static str,
    pub recommendation_exercise: &'static str,
    pub recommendation_study: &'static str,
}

static LABELS_EN: Labels = Labels {
    mood_good: "Good",
    mood_normal: "Normal",
    mood_bad: "Bad",
    metric_sleep: "Sleep",
    metric_study: "Study",
    metric_exercise: "Exercise",
    hours_suffix: "h",
    day_tick: |day| format!("day {day}"),
    days_count: |days| format!("{days} days"),
    tick_start: "start",
    tick_middle: "middle",
    tick_recent: "recent",
    donut_title: "Mood distribution",
    sleep_chart_title: "Sleep trend",
    study_chart_title: "Study distribution",
    heatmap_title: "Daily activity pattern",
    period_label: "Analysis period",
    per_day: "per day",
    insight_sleep_link: "Sleep-mood link",
    insight_sleep_warn: "Check the relationship between sleep and mood",
    insight_exercise_link: "Exercise-mood link",
    insight_exercise_hint: "Exercise may help improve mood",
    card_avg_sleep: "Average sleep",
    card_avg_study: "Average study",
    card_total_exercise: "Total exercise",
    card_good_ratio: "Good-mood ratio",
    vs_baseline: "vs. baseline",
    needs_exercise: "Exercise needed!",
    verdict_positive: "Overall a positive lifestyle!",
    verdict_improvable: "There is room to improve!",
    verdict_alert: "Lifestyle needs attention!",
    priority_sleep: "Extend sleep time",
    priority_exercise: "Start exercising",
    priority_stress: "Manage stress",
    priorities_clear: "Current lifestyle is in good shape!",
    recommendation_sleep: "Try extending sleep to 7-8 hours!",
    recommendation_exercise: "How about adding some exercise time?",
    recommendation_study: "Your steady study pattern looks great!",
};

static LABELS_KO: Labels = Labels {
    mood_good: "좋음",
    mood_normal: "보통",
    mood_bad: "나쁨",
    metric_sleep: "수면시간",
    metric_study: "공부시간",
    metric_exercise: "운동시간",
    hours_suffix: "시간",
    day_tick: |day| format!("{day}일차"),
    days_count: |days| format!("{days}일"),
    tick_start: "시작",
    tick_middle: "중간",
    tick_recent: "최근",
    donut_title: "기분 분포",
    sleep_chart_title: "수면시간 변화",
    study_chart_title: "공부시간 분포",
    heatmap_title: "일별 활동 패턴",
    period_label: "분석 기간",
    per_day: "일 평균",
    insight_sleep_link: "수면-기분 상관관계",
    insight_sleep_warn: "수면시간과 기분의 관계를 점검해보세요",
    insight_exercise_link: "운동-기분 상관관계",
    insight_exercise_hint: "운동이 기분 개선에 도움될 수 있습니다",
    card_avg_sleep: "평균 수면시간",
    card_avg_study: "평균 공부시간",
    card_total_exercise: "총 운동시간",
    card_good_ratio: "좋은 기분 비율",
    vs_baseline: "기준 대비",
    needs_exercise: "운동 필요!",
    verdict_positive: "전반적으로 긍정적인 라이프스타일!",
    verdict_improvable: "개선의 여지가 있습니다!",
    verdict_alert: "라이프스타일 개선이 필요합니다!",
    priority_sleep: "수면시간 늘리기",
    priority_exercise: "운동 시작하기",
    priority_stress: "스트레스 관리",
    priorities_clear: "현재 라이프스타일이 양호합니다!",
    recommendation_sleep: "수면시간을 7-8시간으로 늘려보세요!",
    recommendation_exercise: "운동시간을 추가해보시는 것은 어떨까요?",
    recommendation_study: "꾸준한 공부 패턴이 좋습니다!",
};

impl Labels {
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::En => &LABELS_EN,
            Locale::Ko => &LABELS_KO,
        }
    }

    pub fn metric(&self, metric: crate::models::Metric) -> &'static str {
        match metric {
            crate::models::Metric::Sleep => self.metric_sleep,
            crate::models::Metric::Study => self.metric_study,
            crate::models::Metric::Exercise => self.metric_exercise,
        }
    }
}
