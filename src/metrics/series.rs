//! Chart series and lookback filtering.

use crate::error::ArkaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
    pub value: f64,
}

/// Chart lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeTag {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl RangeTag {
    pub const ALL: [RangeTag; 4] = [
        RangeTag::OneMinute,
        RangeTag::FiveMinutes,
        RangeTag::OneHour,
        RangeTag::OneDay,
    ];

    /// Window length in milliseconds.
    pub fn window_millis(self) -> u64 {
        match self {
            RangeTag::OneMinute => 60_000,
            RangeTag::FiveMinutes => 300_000,
            RangeTag::OneHour => 3_600_000,
            RangeTag::OneDay => 86_400_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RangeTag::OneMinute => "1m",
            RangeTag::FiveMinutes => "5m",
            RangeTag::OneHour => "1h",
            RangeTag::OneDay => "1d",
        }
    }
}

impl fmt::Display for RangeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeTag {
    type Err = ArkaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ArkaError::unknown_range(s))
    }
}

/// Keep the points no older than the tag's window, preserving order.
pub fn filter_by_range(series: &[SeriesPoint], tag: RangeTag, now: u64) -> Vec<SeriesPoint> {
    let window = tag.window_millis();
    series
        .iter()
        .filter(|point| now.saturating_sub(point.timestamp) <= window)
        .copied()
        .collect()
}

/// Like [`filter_by_range`] but takes the textual tag. Unknown tags keep the
/// whole series.
pub fn filter_by_range_tag(series: &[SeriesPoint], tag: &str, now: u64) -> Vec<SeriesPoint> {
    match tag.parse::<RangeTag>() {
        Ok(tag) => filter_by_range(series, tag, now),
        Err(_) => series.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(now: u64, count: u64) -> Vec<SeriesPoint> {
        (0..count)
            .map(|i| SeriesPoint {
                timestamp: now - (count - 1 - i) * 1_000,
                value: i as f64,
            })
            .collect()
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("1m".parse::<RangeTag>().unwrap(), RangeTag::OneMinute);
        assert_eq!("1d".parse::<RangeTag>().unwrap(), RangeTag::OneDay);
        assert!(matches!(
            "2w".parse::<RangeTag>(),
            Err(ArkaError::UnknownRange(tag)) if tag == "2w"
        ));
        assert_eq!(RangeTag::FiveMinutes.to_string(), "5m");
    }

    #[test]
    fn test_filter_one_minute_window() {
        let now = 10_000_000;
        let points = series(now, 120);
        let kept = filter_by_range(&points, RangeTag::OneMinute, now);

        // 60 s back inclusive: 61 points at 1 s spacing
        assert_eq!(kept.len(), 61);
        assert_eq!(kept.last(), points.last());
        assert!(kept.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_unknown_tag_keeps_everything() {
        let now = 10_000_000;
        let points = series(now, 120);
        assert_eq!(filter_by_range_tag(&points, "forever", now), points);
        assert_eq!(filter_by_range_tag(&points, "5m", now).len(), 120);
    }
}
