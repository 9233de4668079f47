//! Formatting shared across report generators.

use crate::analytics::Trend;
use chrono::{DateTime, Utc};

/// Format an optional statistic, showing `n/a` when the source did not report it
pub fn format_stat(value: Option<u64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Format a timestamp as date-only (YYYY-MM-DD)
pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "n/a".to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

pub fn format_hours(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |h| format!("{h:.1}h"))
}

pub const fn format_trend(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↑ rising",
        Trend::Down => "↓ falling",
        Trend::Stable => "→ stable",
    }
}

/// Band a 0..=100 health score falls into
pub const fn health_band(score: u8) -> &'static str {
    match score {
        70..=100 => "HEALTHY",
        40..=69 => "FAIR",
        _ => "AT RISK",
    }
}

/// Eight-level bar chart of a series, scaled to its maximum
pub fn sparkline(values: &[u64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let max = values.iter().copied().max().unwrap_or(0);
    values
        .iter()
        .map(|&v| {
            if max == 0 {
                BARS[0]
            } else {
                let level = usize::try_from(v * 7 / max).unwrap_or(7).min(7);
                BARS[level]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(Some(12)), "12");
        assert_eq!(format_stat(None), "n/a");
    }

    #[test]
    fn test_format_date() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(Some(dt)), "2024-01-15");
        assert_eq!(format_date(None), "n/a");
    }

    #[test]
    fn test_health_band() {
        assert_eq!(health_band(90), "HEALTHY");
        assert_eq!(health_band(70), "HEALTHY");
        assert_eq!(health_band(55), "FAIR");
        assert_eq!(health_band(2), "AT RISK");
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[0, 0, 0]), "▁▁▁");
        assert_eq!(sparkline(&[0, 7, 14]), "▁▄█");
        assert_eq!(sparkline(&[]), "");
    }
}
