use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of submission timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock pinned to the deployment's canonical offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

pub fn utc_offset_from_hours(hours: i32) -> Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow::anyhow!("UTC offset out of range: {} hours", hours))
}

pub fn format_record_time(datetime: DateTime<FixedOffset>) -> String {
    datetime.format(RECORD_TIME_FORMAT).to_string()
}

pub fn parse_record_time(time_str: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(time_str.trim(), RECORD_TIME_FORMAT)
        .map_err(|_| anyhow::anyhow!("Invalid time format. Use YYYY-MM-DD HH:MM:SS"))
}

#[cfg(test)]
pub(crate) struct FixedClock(pub DateTime<FixedOffset>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn system_clock_uses_configured_offset() {
        let clock = SystemClock::new(utc_offset_from_hours(8).unwrap());
        assert_eq!(clock.now().offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn offsets_outside_a_day_are_rejected() {
        assert!(utc_offset_from_hours(-5).is_ok());
        assert!(utc_offset_from_hours(24).is_err());
        assert!(utc_offset_from_hours(1_000_000).is_err());
        assert!(utc_offset_from_hours(i32::MIN).is_err());
    }

    #[test]
    fn record_time_format() {
        let offset = utc_offset_from_hours(8).unwrap();
        let datetime = offset.with_ymd_and_hms(2024, 12, 31, 23, 59, 1).unwrap();
        let formatted = format_record_time(datetime);
        assert_eq!(formatted, "2024-12-31 23:59:01");
        assert_eq!(parse_record_time(&formatted).unwrap(), datetime.naive_local());
        assert!(parse_record_time("31/12/2024 23:59").is_err());
    }
}
