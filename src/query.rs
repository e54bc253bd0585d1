//! The one public entry point.
//!
//! `SearchRequest` bundles the query's five arguments (source, destination,
//! date, earliest departure, transfer bound) plus an optional cancellation
//! handle into one struct, the way a library call should take its
//! parameters rather than a long positional argument list.

use crate::calendar;
use crate::cancel::CancellationToken;
use crate::error::{EngineError, EngineResult};
use crate::itinerary::{self, Itinerary};
use crate::raptor;
use crate::timetable::TimetableIndex;

/// Upper bound on `max_transfers`.
pub const MAX_TRANSFERS_LIMIT: u32 = 10;

pub struct SearchRequest<'a> {
    pub source_code: &'a str,
    pub dest_code: &'a str,
    pub service_date: &'a str,
    pub earliest_dep_hhmm: &'a str,
    pub max_transfers: u32,
    /// Checked once per round boundary; `None` means the search always
    /// runs to completion.
    pub cancellation: Option<CancellationToken>,
}

/// Runs one multi-criteria earliest-arrival query and returns every
/// Pareto-optimal itinerary.
pub fn search_journeys(
    index: &TimetableIndex,
    request: &SearchRequest,
) -> EngineResult<Vec<Itinerary>> {
    if request.max_transfers > MAX_TRANSFERS_LIMIT {
        return Err(EngineError::InvalidInput(format!(
            "max_transfers must be in [0, {MAX_TRANSFERS_LIMIT}], got {}",
            request.max_transfers
        )));
    }

    let departure_minute = parse_hhmm(request.earliest_dep_hhmm)?;

    let source = index
        .resolve_stop(request.source_code)
        .ok_or_else(|| EngineError::UnknownStop(request.source_code.to_string()))?;
    let dest = index
        .resolve_stop(request.dest_code)
        .ok_or_else(|| EngineError::UnknownStop(request.dest_code.to_string()))?;

    // weekday_index validates the date format; calendar::weekday_index is
    // also called inside raptor::search, but failing fast here avoids
    // running a search only to discover the date was malformed.
    calendar::weekday_index(request.service_date)?;

    let outcome = raptor::search(
        index,
        source,
        departure_minute,
        request.service_date,
        request.max_transfers,
        request.cancellation.as_ref(),
    )?;

    let itineraries: Vec<Itinerary> = outcome
        .frontier_at(dest)
        .snapshot()
        .into_iter()
        .filter_map(|label_id| itinerary::reconstruct(index, &outcome.arena, label_id))
        .collect();

    if itineraries.is_empty() {
        log::warn!(
            "no itineraries from {} to {} on {}",
            request.source_code,
            request.dest_code,
            request.service_date
        );
        return Err(EngineError::NoRoutes);
    }

    Ok(itineraries)
}

/// Parses `HH:MM` (24-hour) into minutes-from-midnight in `[0, 1440)`.
fn parse_hhmm(s: &str) -> EngineResult<i64> {
    let invalid = || EngineError::InvalidTime(s.to_string());

    let mut parts = s.split(':');
    let (Some(h), Some(m), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hour: i64 = h.parse().map_err(|_| invalid())?;
    let minute: i64 = m.parse().map_err(|_| invalid())?;
    if hour >= 24 || minute >= 60 {
        return Err(invalid());
    }
    Ok(hour * 60 + minute)
}
