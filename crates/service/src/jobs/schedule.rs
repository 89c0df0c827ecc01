//! Calendar arithmetic for job listings.
//!
//! All windows are computed in one fixed scheduling offset and returned as UTC
//! instants; both ends are inclusive, the end being the last millisecond of
//! the final day.

use chrono::{DateTime, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use configs::SchedulingConfig;

use crate::errors::ServiceError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Scheduling behaviour resolved from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SchedulePolicy {
    pub zone: FixedOffset,
    pub upcoming_default_days: u32,
    pub enforce_status_transitions: bool,
}

impl SchedulePolicy {
    pub fn from_config(cfg: &SchedulingConfig) -> Self {
        Self {
            zone: scheduling_zone(cfg.utc_offset_minutes),
            upcoming_default_days: cfg.upcoming_default_days,
            enforce_status_transitions: cfg.enforce_status_transitions,
        }
    }

    /// Current calendar date in the scheduling zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.zone).date_naive()
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self { Self::from_config(&SchedulingConfig::default()) }
}

/// Fixed offset from minutes east of UTC; the host's current local offset when unset
/// or out of range.
pub fn scheduling_zone(offset_minutes: Option<i32>) -> FixedOffset {
    offset_minutes
        .and_then(|m| FixedOffset::east_opt(m * 60))
        .unwrap_or_else(|| Local::now().offset().fix())
}

fn start_of_day(date: NaiveDate, zone: &FixedOffset) -> Result<DateTime<Utc>, ServiceError> {
    local_to_utc(date.and_time(NaiveTime::MIN), zone)
}

fn local_to_utc(naive: NaiveDateTime, zone: &FixedOffset) -> Result<DateTime<Utc>, ServiceError> {
    zone.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ServiceError::Validation(format!("{naive} is not representable in offset {zone}")))
}

/// `[date 00:00:00.000, date 23:59:59.999]` in `zone`.
pub fn day_window(date: NaiveDate, zone: &FixedOffset) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let start = start_of_day(date, zone)?;
    let next = date
        .succ_opt()
        .ok_or_else(|| ServiceError::Validation(format!("date {date} is out of range")))?;
    let end = start_of_day(next, zone)? - Duration::milliseconds(1);
    Ok((start, end))
}

/// `[today 00:00:00.000, (today + days) 23:59:59.999]` in `zone`.
pub fn upcoming_window(
    today: NaiveDate,
    days: u32,
    zone: &FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let last = today
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| ServiceError::Validation(format!("{days} days from {today} is out of range")))?;
    let (start, _) = day_window(today, zone)?;
    let (_, end) = day_window(last, zone)?;
    Ok((start, end))
}

/// Parses a `date` query value (`YYYY-MM-DD`).
pub fn parse_date(text: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::Validation(format!("invalid date '{text}', expected YYYY-MM-DD")))
}

/// `days` query value for the upcoming window: a non-negative whole number.
pub fn parse_days(text: &str) -> Result<u32, ServiceError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| ServiceError::Validation(format!("invalid days '{text}', expected a non-negative integer")))
}

/// Parses a job's `scheduledAt`.
///
/// Timestamps with an offset are taken as-is; naive date-times and bare dates
/// are wall-clock time in `zone` (a bare date means local midnight).
pub fn parse_scheduled_at(text: &str, zone: &FixedOffset) -> Result<DateTime<Utc>, ServiceError> {
    let s = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(naive, zone);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return start_of_day(date, zone);
    }
    Err(ServiceError::Validation(format!("invalid scheduledAt '{text}'")))
}
