//! Activity trend classification over the weekly commit series.

use super::model::ProjectAnalytics;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Percentage change beyond which activity counts as rising or falling
const TREND_THRESHOLD_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    /// How consistent the series is, 0 to 1
    pub confidence: f64,
    /// Change of the recent half's mean relative to the older half's, in percent
    pub change_percent: f64,
}

/// Trend of a project's weekly activity
#[must_use]
pub fn trend(analytics: &ProjectAnalytics) -> TrendResult {
    classify(&analytics.weekly_counts())
}

/// Compare the newer half of an oldest-first series with the older half
#[must_use]
pub fn classify(series: &[u64]) -> TrendResult {
    #[expect(clippy::cast_precision_loss, reason = "commit counts are far below 2^52")]
    let values: Vec<f64> = series.iter().map(|&v| v as f64).collect();
    let (older, recent) = values.split_at(values.len() / 2);

    let older_mean = mean(older);
    let recent_mean = mean(recent);
    let change_percent = (recent_mean - older_mean) * 100.0 / older_mean.max(1.0);

    let trend = if change_percent > TREND_THRESHOLD_PERCENT {
        Trend::Up
    } else if change_percent < -TREND_THRESHOLD_PERCENT {
        Trend::Down
    } else {
        Trend::Stable
    };

    let spread = std_dev(older).max(std_dev(recent));
    let confidence = (1.0 - spread / (mean(&values) + 1.0)).clamp(0.0, 1.0);

    TrendResult {
        trend,
        confidence,
        change_percent,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    #[expect(clippy::cast_precision_loss, reason = "series are short")]
    let len = values.len() as f64;
    values.iter().sum::<f64>() / len
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let m = mean(values);
    let variance = mean(&values.iter().map(|v| (v - m).powi(2)).collect::<Vec<_>>());
    variance.sqrt()
}
