//! Merging a calendar date, a wall-clock time, and a user timezone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::TemporalError;

/// Legacy zone names carried over from the original deployment's user
/// profiles, mapped to their IANA identifiers.
const ZONE_ALIASES: &[(&str, &str)] = &[
    ("Brasilia", "America/Sao_Paulo"),
    ("Eastern Time (US & Canada)", "America/New_York"),
    ("Central Time (US & Canada)", "America/Chicago"),
    ("Pacific Time (US & Canada)", "America/Los_Angeles"),
    ("Moscow", "Europe/Moscow"),
    ("Tokyo", "Asia/Tokyo"),
];

/// Resolves a timezone identifier to a concrete zone.
///
/// Accepts IANA names ("America/Sao_Paulo") and a handful of legacy
/// aliases ("Brasilia").
///
/// # Errors
///
/// Returns `TemporalError::UnknownTimezone` for anything else.
pub fn resolve_timezone(name: &str) -> Result<Tz, TemporalError> {
    let name = name.trim();
    if let Ok(tz) = name.parse::<Tz>() {
        return Ok(tz);
    }
    ZONE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .and_then(|(_, iana)| iana.parse::<Tz>().ok())
        .ok_or_else(|| TemporalError::UnknownTimezone(name.to_string()))
}

/// Stateless service merging date, time-of-day, and zone into one instant.
pub struct TemporalNormalizer;

impl TemporalNormalizer {
    /// Normalizes a date and optional time-of-day into a UTC instant.
    ///
    /// The date is required and must parse as `YYYY-MM-DD`. The time-of-day
    /// is optional; when absent or unparsable it defaults to the current
    /// wall-clock time if the date is "today" in the user's zone, and to
    /// midnight otherwise. The result redisplays as the same wall-clock
    /// date/time in the user's zone regardless of the server zone.
    ///
    /// # Errors
    ///
    /// Returns `TemporalError::InvalidDate` if the date cannot be parsed.
    pub fn normalize(
        date: &str,
        time: Option<&str>,
        tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, TemporalError> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| TemporalError::InvalidDate(date.to_string()))?;

        let local_now = now.with_timezone(&tz);
        let time_of_day = time
            .and_then(parse_time_of_day)
            .unwrap_or_else(|| default_time_of_day(day, local_now.date_naive(), local_now.time()));

        let naive = day.and_time(time_of_day);
        let local = match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            // DST fall-back repeats an hour; take the earlier occurrence.
            LocalResult::Ambiguous(earliest, _) => earliest,
            // DST spring-forward gap; shift to the next valid hour.
            LocalResult::None => tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .ok_or_else(|| TemporalError::InvalidDate(date.to_string()))?,
        };

        Ok(local.with_timezone(&Utc))
    }
}

fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn default_time_of_day(day: NaiveDate, today: NaiveDate, now: NaiveTime) -> NaiveTime {
    if day == today {
        now
    } else {
        NaiveTime::MIN
    }
}
