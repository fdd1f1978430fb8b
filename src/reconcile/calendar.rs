//! Calendar helpers: which day the job is reconciling and which instants
//! count as "that day" when matching attendance events.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How the matching window for a calendar date is anchored.
///
/// `Utc` reproduces the legacy behavior: the window is midnight-to-midnight
/// UTC even though the job runs on local time, so events recorded late in the
/// local evening may fall on the next UTC day. `Local` anchors the window on
/// the configured zone instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    Utc,
    Local,
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Calendar date of `now` as seen in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Lowercase Spanish weekday name, as stored in shift rosters.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

pub fn day_bounds(date: NaiveDate, mode: DayBoundary, tz: Tz) -> DayBounds {
    let next = date + Duration::days(1);
    match mode {
        DayBoundary::Utc => DayBounds {
            start: utc_midnight(date),
            end: utc_midnight(next),
        },
        DayBoundary::Local => DayBounds {
            start: local_midnight(date, tz),
            end: local_midnight(next, tz),
        },
    }
}

fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

// Zones that jump over midnight on a DST change have no local 00:00; the
// first instant after the gap starts the day there.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=2)
        .find_map(|hour| {
            tz.from_local_datetime(&(midnight + Duration::hours(hour)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| utc_midnight(date))
}
