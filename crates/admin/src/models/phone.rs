//! Phone numbers rented from the SMS provider

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Shown when a phone has no expiry
pub const NO_EXPIRY: &str = "—";

const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// A phone number in the pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub id: i64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub used_count: Option<u32>,
    #[serde(default)]
    pub max_use_count: Option<u32>,
    /// UTC timestamp, either naive ("YYYY-MM-DD HH:MM:SS") or ISO 8601
    #[serde(default)]
    pub expired_at: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

impl Phone {
    /// Usage column, "used/max" with missing counts read as 0 and 1
    pub fn usage(&self) -> String {
        format!(
            "{}/{}",
            self.used_count.unwrap_or(0),
            self.max_use_count.unwrap_or(1)
        )
    }

    /// Expiry column in the local timezone
    pub fn expiry_display(&self) -> String {
        format_expired_at(self.expired_at.as_deref())
    }
}

/// Payload for `POST /api/phones`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPhone {
    pub phone: String,
    pub max_use_count: u32,
    pub remark: String,
}

/// Parse an expiry timestamp. Strings without an offset are UTC.
pub fn parse_expired_at(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format an expiry for display in the local timezone
pub fn format_expired_at(raw: Option<&str>) -> String {
    format_expired_at_in(raw, &Local)
}

/// Format an expiry for display in `tz`.
///
/// Missing values show [`NO_EXPIRY`]; unparseable values are shown verbatim.
pub fn format_expired_at_in<Tz>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return NO_EXPIRY.to_string();
    };
    match parse_expired_at(raw) {
        Some(dt) => dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_usage_defaults() {
        let phone = Phone {
            id: 1,
            ..Default::default()
        };
        assert_eq!(phone.usage(), "0/1");

        let phone = Phone {
            id: 2,
            used_count: Some(2),
            max_use_count: Some(3),
            ..Default::default()
        };
        assert_eq!(phone.usage(), "2/3");
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let shown = format_expired_at_in(Some("2024-05-01 16:30:00"), &utc8());
        assert_eq!(shown, "2024/05/02 00:30:00");
    }

    #[test]
    fn test_iso_timestamp_with_offset() {
        let shown = format_expired_at_in(Some("2024-05-01T16:30:00Z"), &utc8());
        assert_eq!(shown, "2024/05/02 00:30:00");

        let shown = format_expired_at_in(Some("2024-05-01T08:00:00+08:00"), &Utc);
        assert_eq!(shown, "2024/05/01 00:00:00");
    }

    #[test]
    fn test_missing_and_unparseable() {
        assert_eq!(format_expired_at_in(None, &Utc), NO_EXPIRY);
        assert_eq!(format_expired_at_in(Some(""), &Utc), NO_EXPIRY);
        assert_eq!(format_expired_at_in(Some("soon"), &Utc), "soon");
    }
}
