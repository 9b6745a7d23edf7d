//! The return form posts the wall-clock time shown on the branch desk
//! (an HTML `datetime-local` value) plus the branch time zone. Charges are
//! computed in UTC, so the pair has to be resolved here.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Convert a branch-local timestamp to **UTC**.
///
/// * `raw`  – `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS`.
/// * `zone` –
///   * `"America/Chicago"` → IANA zone (DST-aware)
///   * `"-5"`              → fixed offset in **hours**
pub fn local_to_utc(raw: &str, zone: &str) -> anyhow::Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))?;

    if zone.contains('/') {
        let tz: Tz = zone.parse().map_err(|_| anyhow::anyhow!("unknown time zone {}", zone))?;
        return match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            // DST fall-back repeats an hour; take the earlier reading
            LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
            LocalResult::None => {
                anyhow::bail!("{} is not a valid local time in {}", raw, zone)
            }
        };
    }

    let hours: i32 = zone.parse()?;
    let offset = FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| anyhow::anyhow!("invalid offset {}", zone))?;
    match offset.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => {
            anyhow::bail!("{} is not a valid local time with offset {}", raw, zone)
        }
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_local_with_iana_zone() {
        let t = local_to_utc("2024-01-11T14:00", "America/Chicago").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-01-11T20:00:00+00:00");
    }

    #[test]
    fn seconds_are_accepted() {
        let t = local_to_utc("2024-01-11T14:00:30", "0").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-01-11T14:00:30+00:00");
    }

    #[test]
    fn fixed_offset_hours() {
        let t = local_to_utc("2025-04-13T17:44", "-5").unwrap();
        assert_eq!(t.to_rfc3339(), "2025-04-13T22:44:00+00:00");
    }

    #[test]
    fn dst_aware_summer_offset() {
        let t = local_to_utc("2025-07-13T17:44", "America/Chicago").unwrap();
        assert_eq!(t.to_rfc3339(), "2025-07-13T22:44:00+00:00");
    }

    #[test]
    fn unknown_zone_errors() {
        let err = local_to_utc("2024-01-11T14:00", "Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("unknown time zone"));
    }

    #[test]
    fn garbage_timestamp_errors() {
        assert!(local_to_utc("11/01/2024 14:00", "America/Chicago").is_err());
    }

    #[test]
    fn spring_forward_gap_is_rejected() {
        // 2:30 does not exist on 2025-03-09 in Chicago
        let err = local_to_utc("2025-03-09T02:30", "America/Chicago").unwrap_err();
        assert!(err.to_string().contains("not a valid local time"));
    }
}
