//! Reduces a candidate route set to those running on a service date.
//!
//! Running-day bitmasks use `0 = Sunday ... 6 = Saturday`. Deriving that
//! index from ISO's weekday numbering (Monday=1 ... Sunday=7) via
//! `(iso_weekday + 1) mod 7` is a trap: it actually yields `Saturday=0,
//! Sunday=1, ... Friday=6`, off by one from the mask's own convention, and
//! wrong polarity here silently filters out every route on every day.
//! `chrono::Weekday::num_days_from_sunday` returns `Sunday=0 ... Saturday=6`
//! directly, so this module uses that accessor with no extra translation
//! step instead of reimplementing the mapping from the ISO weekday.

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::ids::RouteId;
use crate::timetable::TimetableIndex;

/// Parses `YYYY-MM-DD` and returns the weekday index in `[0, 6]`,
/// `0 = Sunday`.
pub fn weekday_index(service_date: &str) -> EngineResult<u8> {
    let date = NaiveDate::parse_from_str(service_date, "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(service_date.to_string()))?;
    Ok(date.weekday().num_days_from_sunday() as u8)
}

/// Filters `candidates` down to the routes whose running-day bit is set
/// at `service_date`'s weekday index.
pub fn routes_running_on(
    index: &TimetableIndex,
    candidates: impl IntoIterator<Item = RouteId>,
    service_date: &str,
) -> EngineResult<Vec<RouteId>> {
    let weekday = weekday_index(service_date)?;
    Ok(candidates
        .into_iter()
        .filter(|&route| route_runs_on_weekday(index, route, weekday))
        .collect())
}

pub fn route_runs_on_weekday(index: &TimetableIndex, route: RouteId, weekday: u8) -> bool {
    (index.running_days(route) >> weekday) & 1 == 1
}
