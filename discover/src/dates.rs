//! Datetime window handling.
//!
//! A query window is either relative (`statsPeriod`, e.g. `14d`) or absolute
//! (`start` and `end`). Relative always wins when both are present.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, Utc};
use regex::Regex;

use crate::config::DisplayConfig;
use crate::location::{decode_scalar, Query, QueryValue};
use crate::{Error, Result};

fn stats_period_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)([smhdw])$").expect("stats period regex is valid"))
}

/// A datetime window as carried in URLs and payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub stats_period: Option<String>,
    pub utc: Option<String>,
}

impl DateTimeParams {
    /// Read the raw window from URL parameters. `statsPeriod` takes
    /// precedence over the legacy `period` key.
    pub fn from_query(query: &Query) -> Self {
        Self {
            start: decode_scalar(query.get("start")),
            end: decode_scalar(query.get("end")),
            stats_period: decode_scalar(query.get("statsPeriod"))
                .or_else(|| decode_scalar(query.get("period"))),
            utc: decode_scalar(query.get("utc")),
        }
    }

    /// Whether a usable window is set: a relative period, or both bounds.
    pub fn has_selection(&self) -> bool {
        self.stats_period.is_some() || (self.start.is_some() && self.end.is_some())
    }

    /// Validate and canonicalize, falling back to `default_period` when no
    /// window is selected.
    pub fn normalize(&self, default_period: Option<&str>) -> Self {
        let period = self
            .stats_period
            .as_deref()
            .filter(|p| stats_period_regex().is_match(p))
            .map(str::to_string);
        let start = self.start.as_deref().and_then(parse_date).map(|d| get_utc_date_string(&d));
        let end = self.end.as_deref().and_then(parse_date).map(|d| get_utc_date_string(&d));
        let absolute = start.is_some() && end.is_some();

        let stats_period = match period {
            Some(p) => Some(p),
            None if absolute => None,
            None => default_period.map(str::to_string),
        };
        let (start, end) = if stats_period.is_none() && absolute {
            (start, end)
        } else {
            (None, None)
        };

        Self {
            start,
            end,
            stats_period,
            utc: self
                .utc
                .as_deref()
                .map(|u| if u == "true" { "true" } else { "false" }.to_string()),
        }
    }

    /// Write the set keys into a query map.
    pub fn write_to(&self, query: &mut Query) {
        let entries = [
            ("start", &self.start),
            ("end", &self.end),
            ("statsPeriod", &self.stats_period),
            ("utc", &self.utc),
        ];
        for (key, value) in entries {
            if let Some(v) = value {
                query.insert(key.to_string(), QueryValue::from(v.as_str()));
            }
        }
    }

    /// Length of the window in days. Zero when no window is set.
    pub fn days(&self) -> f64 {
        if let Some(duration) = self.stats_period.as_deref().and_then(parse_stats_period) {
            return duration.num_seconds() as f64 / 86_400.0;
        }
        let bounds = (
            self.start.as_deref().and_then(parse_date),
            self.end.as_deref().and_then(parse_date),
        );
        match bounds {
            (Some(start), Some(end)) => (end - start).num_seconds() as f64 / 86_400.0,
            _ => 0.0,
        }
    }
}

/// Normalize the datetime keys of URL parameters. See [`DateTimeParams::normalize`].
pub fn normalize_date_time_params(query: &Query, default_period: Option<&str>) -> DateTimeParams {
    DateTimeParams::from_query(query).normalize(default_period)
}

/// Parse a relative period such as `90m`, `24h` or `2w`.
pub fn parse_stats_period(period: &str) -> Option<TimeDelta> {
    let caps = stats_period_regex().captures(period.trim())?;
    let amount: i64 = caps[1].parse().ok()?;
    match &caps[2] {
        "s" => TimeDelta::try_seconds(amount),
        "m" => TimeDelta::try_minutes(amount),
        "h" => TimeDelta::try_hours(amount),
        "d" => TimeDelta::try_days(amount),
        "w" => TimeDelta::try_weeks(amount),
        _ => None,
    }
}

/// Parse an absolute date.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC, with
/// `T` or a space as separator) and plain `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format without an offset, as the search API expects.
pub fn get_utc_date_string(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Seconds since the epoch for a table date cell.
///
/// Numbers are taken as already being timestamps. `null` yields `None`.
pub fn get_time_stamp_from_table_date_field(value: &serde_json::Value) -> Result<Option<f64>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => Ok(n.as_f64()),
        serde_json::Value::String(s) => parse_date(s)
            .map(|dt| Some(dt.timestamp_millis() as f64 / 1000.0))
            .ok_or_else(|| Error::InvalidTimestamp("NaN".to_string())),
        _ => Err(Error::InvalidTimestamp("NaN".to_string())),
    }
}

/// Render a timestamp for people, honouring the configured offset and clock.
pub fn format_date_for_display(dt: &DateTime<Utc>, display: &DisplayConfig) -> String {
    let offset =
        FixedOffset::east_opt(display.timezone_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
    let local = dt.with_timezone(&offset);
    if display.clock_24_hours {
        local.format("%b %-d, %Y %H:%M:%S").to_string()
    } else {
        local.format("%b %-d, %Y %-I:%M:%S %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query(pairs: &[(&str, &str)]) -> Query {
        pairs.iter().map(|(k, v)| (k.to_string(), QueryValue::from(*v))).collect()
    }

    #[test]
    fn test_period_maps_to_stats_period() {
        let params = normalize_date_time_params(&query(&[("period", "24h")]), None);
        assert_eq!(params.stats_period.as_deref(), Some("24h"));
    }

    #[test]
    fn test_relative_period_drops_absolute_bounds() {
        let params = normalize_date_time_params(
            &query(&[("statsPeriod", "7d"), ("start", "2024-01-01"), ("end", "2024-01-02")]),
            None,
        );
        assert_eq!(params.stats_period.as_deref(), Some("7d"));
        assert_eq!(params.start, None);
        assert_eq!(params.end, None);
    }

    #[test]
    fn test_absolute_window_normalized() {
        let params = normalize_date_time_params(
            &query(&[
                ("start", "2024-01-01T10:00:00+02:00"),
                ("end", "2024-01-02"),
                ("utc", "yes"),
            ]),
            Some("14d"),
        );
        assert_eq!(params.start.as_deref(), Some("2024-01-01T08:00:00"));
        assert_eq!(params.end.as_deref(), Some("2024-01-02T00:00:00"));
        assert_eq!(params.stats_period, None);
        assert_eq!(params.utc.as_deref(), Some("false"));
    }

    #[test]
    fn test_half_window_falls_back_to_default() {
        let params = normalize_date_time_params(&query(&[("start", "2024-01-01")]), Some("14d"));
        assert_eq!(params.stats_period.as_deref(), Some("14d"));
        assert_eq!(params.start, None);

        let params = normalize_date_time_params(&query(&[("statsPeriod", "bogus")]), None);
        assert_eq!(params, DateTimeParams::default());
    }

    #[test]
    fn test_parse_stats_period() {
        assert_eq!(parse_stats_period("90m"), Some(TimeDelta::minutes(90)));
        assert_eq!(parse_stats_period("2w"), Some(TimeDelta::days(14)));
        assert_eq!(parse_stats_period("14"), None);
        assert_eq!(parse_stats_period("1y"), None);
    }

    #[test]
    fn test_days() {
        let relative = DateTimeParams { stats_period: Some("12h".into()), ..Default::default() };
        assert_eq!(relative.days(), 0.5);

        let absolute = DateTimeParams {
            start: Some("2024-01-01T00:00:00".into()),
            end: Some("2024-01-04T00:00:00".into()),
            ..Default::default()
        };
        assert_eq!(absolute.days(), 3.0);
        assert_eq!(DateTimeParams::default().days(), 0.0);
    }

    #[test]
    fn test_time_stamp_from_table_date_field() {
        let value = serde_json::json!("2024-01-01T00:00:01.500Z");
        assert_eq!(get_time_stamp_from_table_date_field(&value).unwrap(), Some(1_704_067_201.5));
        assert_eq!(
            get_time_stamp_from_table_date_field(&serde_json::json!(42)).unwrap(),
            Some(42.0)
        );
        assert_eq!(get_time_stamp_from_table_date_field(&serde_json::Value::Null).unwrap(), None);

        let err =
            get_time_stamp_from_table_date_field(&serde_json::json!("not a date")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid timestamp: NaN");
    }

    #[test]
    fn test_format_date_for_display() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 15, 4, 9).unwrap();
        let mut display = DisplayConfig::default();
        assert_eq!(format_date_for_display(&dt, &display), "Mar 5, 2024 3:04:09 PM");

        display.clock_24_hours = true;
        display.timezone_offset_minutes = -300;
        assert_eq!(format_date_for_display(&dt, &display), "Mar 5, 2024 10:04:09");
    }
}
