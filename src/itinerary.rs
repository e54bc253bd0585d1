//! Turns one terminal label into a materialized itinerary. Walks the
//! label's `predecessor` chain back to the source label, building one
//! [`Segment`] per hop, then enriches each segment and the journey as a
//! whole with deterministic, pure functions of the timetable.
//!
//! Distance and fare are placeholders until a real distance table exists:
//! 50 km per stop-position difference, fare = distance times a per-route
//! rate (0.5/km by default).

use std::fmt;

use crate::ids::{RouteId, StopId};
use crate::label::{LabelArena, LabelId};
use crate::timetable::TimetableIndex;

/// One leg of an itinerary: boarding `route` at `board_stop`, alighting
/// at `alight_stop`.
#[derive(Debug, Clone)]
pub struct Segment {
    pub route: RouteId,
    pub board_stop: StopId,
    pub alight_stop: StopId,
    /// Minute-of-day at `board_stop`; `None` when the timetable has no
    /// departure there. Reported as unknown rather than synthesized.
    pub departure: Option<i64>,
    pub departure_day_offset: i64,
    pub arrival: Option<i64>,
    pub arrival_day_offset: i64,
    /// `0` when either endpoint's time is unknown.
    pub duration: i64,
    pub comfort: f64,
    pub distance_km: f64,
    pub fare: f64,
}

impl Segment {
    pub fn absolute_departure(&self) -> Option<i64> {
        self.departure.map(|m| m + 1440 * self.departure_day_offset)
    }

    pub fn absolute_arrival(&self) -> Option<i64> {
        self.arrival.map(|m| m + 1440 * self.arrival_day_offset)
    }
}

/// The buffer between one segment's arrival and the next segment's
/// departure, annotated against the alighting stop's minimum transfer
/// time.
#[derive(Debug, Clone, Copy)]
pub struct Transfer {
    pub stop: StopId,
    pub buffer: i64,
    pub sufficient: bool,
}

/// The materialized output of one terminal label.
#[derive(Debug, Clone)]
pub struct Itinerary {
    pub segments: Vec<Segment>,
    /// `transfers_between[i]` is the annotation between `segments[i]` and
    /// `segments[i + 1]`.
    pub transfers_between: Vec<Transfer>,
    pub total_time: i64,
    pub transfers: u32,
    /// Mean of segment comforts. Deliberately distinct from
    /// [`crate::label::Label::comfort`], which dominance compares using
    /// only the final leg's comfort — the two scores measure different
    /// things and are kept apart rather than unified.
    pub comfort: f64,
    pub total_fare: f64,
}

/// Walks `terminal`'s predecessor chain back to the source label and
/// builds an [`Itinerary`]. Returns `None` when reconstruction yields no
/// segments; callers drop these silently rather than surfacing an error.
pub fn reconstruct(
    index: &TimetableIndex,
    arena: &LabelArena,
    terminal: LabelId,
) -> Option<Itinerary> {
    let mut segments = Vec::new();
    let mut current = terminal;

    loop {
        let label = arena.get(current);
        let (Some(route), Some(board_stop), Some(predecessor)) =
            (label.via_route, label.board_stop, label.predecessor)
        else {
            break;
        };
        let alight_stop = label.alight_stop;

        let board_record = index
            .position_in_route(route, board_stop)
            .and_then(|p| index.stop_time(route, p));
        let alight_record = index
            .position_in_route(route, alight_stop)
            .and_then(|p| index.stop_time(route, p));

        let departure = board_record.and_then(|st| st.departure);
        let departure_day_offset = board_record.map(|st| st.day_offset).unwrap_or(0);
        let arrival = alight_record.and_then(|st| st.arrival);
        let arrival_day_offset = alight_record.map(|st| st.day_offset).unwrap_or(0);

        let duration = match (departure, arrival) {
            (Some(d), Some(a)) => {
                let computed = (a + 1440 * arrival_day_offset) - (d + 1440 * departure_day_offset);
                if computed < 0 {
                    log::warn!("segment on route {route} has negative duration ({computed} min), clamping to 0");
                    0
                } else {
                    computed
                }
            }
            _ => 0,
        };

        let board_position = index.position_in_route(route, board_stop);
        let alight_position = index.position_in_route(route, alight_stop);
        let distance_km = match (board_position, alight_position) {
            (Some(bp), Some(ap)) => (ap as i64 - bp as i64).unsigned_abs() as f64 * 50.0,
            _ => 0.0,
        };
        let fare = distance_km * index.fare_per_km(route);

        segments.push(Segment {
            route,
            board_stop,
            alight_stop,
            departure,
            departure_day_offset,
            arrival,
            arrival_day_offset,
            duration,
            comfort: index.comfort_of(route),
            distance_km,
            fare,
        });

        current = predecessor;
    }

    segments.reverse();
    if segments.is_empty() {
        return None;
    }

    let transfers_between = segments
        .windows(2)
        .map(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            let stop = prev.alight_stop;
            match (prev.absolute_arrival(), next.absolute_departure()) {
                (Some(arr), Some(dep)) => {
                    let buffer = dep - arr;
                    Transfer {
                        stop,
                        buffer,
                        sufficient: buffer >= index.min_transfer(stop) as i64,
                    }
                }
                _ => Transfer {
                    stop,
                    buffer: 0,
                    sufficient: false,
                },
            }
        })
        .collect();

    let total_time = match (
        segments.first().and_then(Segment::absolute_departure),
        segments.last().and_then(Segment::absolute_arrival),
    ) {
        (Some(first_dep), Some(last_arr)) => last_arr - first_dep,
        _ => 0,
    };

    let transfers = (segments.len() - 1) as u32;
    let comfort = segments.iter().map(|s| s.comfort).sum::<f64>() / segments.len() as f64;
    let total_fare = segments.iter().map(|s| s.fare).sum();

    Some(Itinerary {
        segments,
        transfers_between,
        total_time,
        transfers,
        comfort,
        total_fare,
    })
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----------------------------------------------")?;
        for segment in &self.segments {
            writeln!(
                f,
                "Board {} at {} via {}.",
                segment.board_stop,
                segment
                    .departure
                    .map(minutes_to_hhmm)
                    .unwrap_or_else(|| "unknown".to_string()),
                segment.route,
            )?;
            writeln!(
                f,
                "Alight {} at {}.",
                segment.alight_stop,
                segment
                    .arrival
                    .map(minutes_to_hhmm)
                    .unwrap_or_else(|| "unknown".to_string()),
            )?;
        }
        writeln!(
            f,
            "Total time: {} min, transfers: {}, comfort: {:.2}, fare: {:.2}",
            self.total_time, self.transfers, self.comfort, self.total_fare
        )?;
        write!(f, "-----------------------------------------------")
    }
}

/// Formats a minute-of-day as `HH:MM`, wrapping multi-day minutes into
/// `[0, 1440)` first. Presentation only — the engine's own arithmetic
/// always stays in absolute minutes.
pub fn minutes_to_hhmm(minutes: i64) -> String {
    let wrapped = minutes.rem_euclid(1440);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}
