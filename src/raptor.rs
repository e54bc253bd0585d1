//! Round-layered relaxation over routes.
//!
//! Round 0 boards only at the source stop, using the query's departure
//! time directly. Each subsequent round relaxes forward from every stop
//! marked in the previous round, gated by the transfer-buffer rule
//! (`min_transfer`). Pruning is dominance alone: there is no "best arrival
//! so far along this trip" shortcut, since a route here is a single
//! scheduled stop-time sequence rather than a table of interchangeable
//! trips, and distinct boardings of the same route in the same round can
//! legitimately produce distinct, equally non-dominated labels that only
//! differ in which stop they boarded at.
//!
//! Each marked stop scans every route touching it independently and walks
//! that route's full downstream pattern, rather than scanning a route once
//! per round from the earliest marked stop on it. Collapsing to a single
//! scan per route would discard the board-stop provenance that later
//! boardings of the same route carry, which this design needs to keep
//! distinct itineraries distinct in reconstruction.

use crate::cancel::CancellationToken;
use crate::calendar;
use crate::error::EngineResult;
use crate::ids::{RouteId, StopId};
use crate::label::{seed, Frontier, Label, LabelArena, LabelId};
use crate::timetable::TimetableIndex;

pub struct SearchOutcome {
    pub arena: LabelArena,
    pub frontiers: Vec<Frontier>,
}

impl SearchOutcome {
    pub fn frontier_at(&self, stop: StopId) -> &Frontier {
        &self.frontiers[stop.index()]
    }
}

/// Runs the round-based search and returns the arena plus every stop's
/// final frontier.
///
/// `max_transfers` must already be validated to `[0, 10]` by the caller;
/// this function runs exactly `max_transfers + 1` rounds unless a round
/// produces no new labels or cancellation trips first.
pub fn search(
    index: &TimetableIndex,
    source: StopId,
    departure_minute: i64,
    service_date: &str,
    max_transfers: u32,
    cancellation: Option<&CancellationToken>,
) -> EngineResult<SearchOutcome> {
    let weekday = calendar::weekday_index(service_date)?;
    let num_stops = index.num_stops();

    log::debug!(
        "raptor search: source={source}, departure={departure_minute}, weekday={weekday}, max_transfers={max_transfers}"
    );

    let mut arena = LabelArena::new();
    let mut frontiers: Vec<Frontier> = (0..num_stops).map(|_| Frontier::new()).collect();

    let (source_label, source_frontier) = seed(&mut arena, source, departure_minute);
    frontiers[source.index()] = source_frontier;

    let mut marked = vec![false; num_stops];
    marked[source.index()] = true;

    // Round 0: board only at the source stop.
    let mut next_marked = vec![false; num_stops];
    relax_all_routes_at(
        index,
        &mut arena,
        &mut frontiers,
        &mut next_marked,
        source,
        source_label,
        departure_minute,
        0,
        weekday,
        None,
    );
    marked = next_marked;

    for k in 1..=max_transfers {
        if let Some(token) = cancellation {
            if token.is_cancelled() {
                return Err(crate::error::EngineError::Cancelled);
            }
        }

        let mut next_marked = vec![false; num_stops];
        let marked_stops: Vec<StopId> = marked
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| m.then(|| StopId(i as u32)))
            .collect();

        for s in marked_stops {
            let label_ids: Vec<LabelId> = frontiers[s.index()]
                .iter()
                .filter(|&id| arena.get(id).transfers == k - 1)
                .collect();

            for label_id in label_ids {
                let label = *arena.get(label_id);
                relax_all_routes_at(
                    index,
                    &mut arena,
                    &mut frontiers,
                    &mut next_marked,
                    s,
                    label_id,
                    label.arrival,
                    k,
                    weekday,
                    Some(index.min_transfer(s) as i64),
                );
            }
        }

        marked = next_marked;
        if !marked.iter().any(|&m| m) {
            log::trace!("raptor search: round {k} marked no stops, stopping early");
            break;
        }
    }

    log::debug!("raptor search: {} labels produced", arena.len());
    Ok(SearchOutcome { arena, frontiers })
}

/// Scans every route serving `boarding_stop`, boards it from `label_id`
/// subject to the boarding rule, and relaxes forward along the route.
#[allow(clippy::too_many_arguments)]
fn relax_all_routes_at(
    index: &TimetableIndex,
    arena: &mut LabelArena,
    frontiers: &mut [Frontier],
    next_marked: &mut [bool],
    boarding_stop: StopId,
    boarding_label: LabelId,
    earliest_arrival: i64,
    result_transfers: u32,
    weekday: u8,
    transfer_buffer: Option<i64>,
) {
    for &(route, position) in index.routes_at(boarding_stop) {
        if !calendar::route_runs_on_weekday(index, route, weekday) {
            continue;
        }

        let Some(stop_time) = index.stop_time(route, position) else {
            continue;
        };
        let Some(departure) = stop_time.absolute_departure() else {
            continue;
        };

        let required = match transfer_buffer {
            Some(buffer) => earliest_arrival + buffer,
            None => earliest_arrival,
        };
        if departure < required {
            continue;
        }

        relax_forward(
            index,
            arena,
            frontiers,
            next_marked,
            route,
            position,
            boarding_stop,
            boarding_label,
            result_transfers,
        );
    }
}

/// Scans `route` forward from `boarding_position`, inserting a candidate
/// label at every downstream stop with a defined arrival.
#[allow(clippy::too_many_arguments)]
fn relax_forward(
    index: &TimetableIndex,
    arena: &mut LabelArena,
    frontiers: &mut [Frontier],
    next_marked: &mut [bool],
    route: RouteId,
    boarding_position: usize,
    boarding_stop: StopId,
    boarding_label: LabelId,
    transfers: u32,
) {
    let pattern = index.route_pattern(route);
    let comfort = index.comfort_of(route);

    for position in (boarding_position + 1)..pattern.len() {
        let Some(stop_time) = index.stop_time(route, position) else {
            continue;
        };
        let Some(arrival) = stop_time.absolute_arrival() else {
            continue;
        };
        let alight_stop = pattern[position];

        let candidate = Label {
            arrival,
            transfers,
            comfort,
            predecessor: Some(boarding_label),
            via_route: Some(route),
            board_stop: Some(boarding_stop),
            alight_stop,
        };
        let candidate_id = arena.push(candidate);

        if frontiers[alight_stop.index()].try_insert(arena, candidate_id) {
            next_marked[alight_stop.index()] = true;
        }
    }
}
