//! Synthetic-timetable builders for tests. Fixtures are written as plain
//! literals rather than loaded from a GTFS fixture file, since this crate
//! never parses GTFS itself.

#![cfg(test)]

use crate::ids::StopId;
use crate::timetable::{IndexBuilder, TimetableIndex};

/// Every day of the week runs.
pub const EVERY_DAY: u8 = 0b111_1111;

/// One stop-time literal: `(stop_code, arrival, departure, day_offset)`.
pub type StopTimeSpec<'a> = (&'a str, Option<i64>, Option<i64>, i64);

pub struct RouteSpec<'a> {
    pub code: &'a str,
    pub running_days: u8,
    pub comfort: f64,
    pub fare_per_km: Option<f64>,
    pub stop_times: Vec<StopTimeSpec<'a>>,
}

impl<'a> RouteSpec<'a> {
    pub fn new(code: &'a str, running_days: u8, comfort: f64, stop_times: Vec<StopTimeSpec<'a>>) -> Self {
        Self {
            code,
            running_days,
            comfort,
            fare_per_km: None,
            stop_times,
        }
    }
}

/// Builds a [`TimetableIndex`] from stop literals `(code, name,
/// min_transfer_minutes)` and a list of [`RouteSpec`]s.
pub fn build_index(
    stops: &[(&str, &str, Option<u32>)],
    routes: Vec<RouteSpec>,
) -> TimetableIndex {
    let mut builder = IndexBuilder::new();
    let mut ids = std::collections::HashMap::new();
    for &(code, name, min_transfer) in stops {
        ids.insert(code, builder.add_stop(code, name, min_transfer));
    }

    for route in &routes {
        builder.add_route(route.code, route.code, route.running_days, Some(route.comfort), route.fare_per_km);
        for (position, &(stop_code, arrival, departure, day_offset)) in route.stop_times.iter().enumerate() {
            let stop_id: StopId = ids[stop_code];
            builder
                .add_stop_time(route.code, stop_id, position, arrival, departure, day_offset)
                .expect("well-formed test fixture");
        }
    }

    builder.build().expect("well-formed test fixture")
}
