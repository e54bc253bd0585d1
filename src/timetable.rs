//! The immutable timetable index.
//!
//! Built once by [`IndexBuilder`] from already-parsed stop, route, and
//! stop-time records (serialized form and ingestion are an external
//! concern — this builder never touches a file format itself), then
//! read-only for the life of the query process. Every accessor here is
//! meant to be amortized O(1).
//!
//! A separate stop→routes table and a separate route/position table would
//! just be redundant with the stop-time records: a stop is "at" a route
//! exactly where a stop-time record places it. Rather than require the
//! caller to pass in two already-derivable copies, this builder builds
//! both internal indices from the stop-time records it is given; a caller
//! whose upstream store genuinely keeps them as separate tables just feeds
//! each stop-time row through [`IndexBuilder::add_stop_time`] once per
//! (route, position).

use std::collections::{HashMap, HashSet};

use crate::error::{EngineError, EngineResult};
use crate::ids::{RouteId, StopId};

/// Default minimum dwell time at a stop when station metadata doesn't
/// name one.
pub const DEFAULT_MIN_TRANSFER_MINUTES: u32 = 30;

/// Default fare-per-km used when a route carries no fare metadata.
pub const DEFAULT_FARE_PER_KM: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct Stop {
    pub code: String,
    pub name: String,
    /// Minimum transfer (dwell) time at this stop, in whole minutes.
    pub min_transfer: u32,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub code: String,
    pub display_name: String,
    /// Ordered stop pattern. Invariant: no stop repeats within one route.
    pub stops: Vec<StopId>,
    /// 7-bit running-day mask, bit 0 = Sunday ... bit 6 = Saturday.
    pub running_days: u8,
    /// Comfort score in [0, 10].
    pub comfort: f64,
    pub fare_per_km: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StopTime {
    /// Minute-of-day, relative to the route's start day. Absent at route
    /// endpoints.
    pub arrival: Option<i64>,
    pub departure: Option<i64>,
    /// Whole days added to `arrival`/`departure` to get an absolute minute.
    pub day_offset: i64,
}

impl StopTime {
    pub fn absolute_arrival(&self) -> Option<i64> {
        self.arrival.map(|m| m + 1440 * self.day_offset)
    }

    pub fn absolute_departure(&self) -> Option<i64> {
        self.departure.map(|m| m + 1440 * self.day_offset)
    }
}

/// The immutable, pre-built timetable.
pub struct TimetableIndex {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    /// `route_stop_times[route][position]`.
    route_stop_times: Vec<Vec<StopTime>>,
    /// `stop_routes[stop] = [(route, position_in_route), ...]`.
    stop_routes: Vec<Vec<(RouteId, usize)>>,
    /// `position_index[(route, stop)] = position`.
    position_index: HashMap<(RouteId, StopId), usize>,
    code_to_stop: HashMap<String, StopId>,
}

impl TimetableIndex {
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Resolves a textual stop code to its dense id, case-insensitively.
    pub fn resolve_stop(&self, code: &str) -> Option<StopId> {
        self.code_to_stop.get(&code.to_ascii_uppercase()).copied()
    }

    pub fn stop(&self, stop: StopId) -> &Stop {
        &self.stops[stop.index()]
    }

    pub fn route(&self, route: RouteId) -> &Route {
        &self.routes[route.index()]
    }

    pub fn route_pattern(&self, route: RouteId) -> &[StopId] {
        &self.routes[route.index()].stops
    }

    pub fn position_in_route(&self, route: RouteId, stop: StopId) -> Option<usize> {
        self.position_index.get(&(route, stop)).copied()
    }

    pub fn stop_time(&self, route: RouteId, position: usize) -> Option<&StopTime> {
        self.route_stop_times[route.index()].get(position)
    }

    pub fn routes_at(&self, stop: StopId) -> &[(RouteId, usize)] {
        &self.stop_routes[stop.index()]
    }

    pub fn running_days(&self, route: RouteId) -> u8 {
        self.routes[route.index()].running_days
    }

    pub fn min_transfer(&self, stop: StopId) -> u32 {
        self.stops[stop.index()].min_transfer
    }

    pub fn comfort_of(&self, route: RouteId) -> f64 {
        self.routes[route.index()].comfort
    }

    pub fn fare_per_km(&self, route: RouteId) -> f64 {
        self.routes[route.index()].fare_per_km
    }
}

struct RouteStaging {
    code: String,
    display_name: String,
    running_days: u8,
    comfort: f64,
    fare_per_km: f64,
    stop_times: Vec<Option<StopTime>>,
    stops: Vec<Option<StopId>>,
}

/// Explicit, construct-once builder for [`TimetableIndex`]. No
/// process-wide loader or cache here — the caller owns one builder and
/// hands the finished index to however many query threads it likes.
#[derive(Default)]
pub struct IndexBuilder {
    stops: Vec<Stop>,
    code_to_stop: HashMap<String, StopId>,
    routes: HashMap<String, RouteStaging>,
    route_order: Vec<String>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stop. `min_transfer_minutes` defaults to
    /// [`DEFAULT_MIN_TRANSFER_MINUTES`] when absent from station metadata.
    pub fn add_stop(
        &mut self,
        code: &str,
        name: &str,
        min_transfer_minutes: Option<u32>,
    ) -> StopId {
        let upper = code.to_ascii_uppercase();
        if let Some(&id) = self.code_to_stop.get(&upper) {
            return id;
        }
        let id = StopId(self.stops.len() as u32);
        self.stops.push(Stop {
            code: code.to_string(),
            name: name.to_string(),
            min_transfer: min_transfer_minutes.unwrap_or(DEFAULT_MIN_TRANSFER_MINUTES),
        });
        self.code_to_stop.insert(upper, id);
        id
    }

    /// Registers a route's metadata. Safe to call more than once for the
    /// same `route_code` (later calls are ignored) since route metadata
    /// and stop-times commonly arrive from separate tables.
    pub fn add_route(
        &mut self,
        route_code: &str,
        display_name: &str,
        running_days: u8,
        comfort: Option<f64>,
        fare_per_km: Option<f64>,
    ) {
        if self.routes.contains_key(route_code) {
            return;
        }
        self.route_order.push(route_code.to_string());
        self.routes.insert(
            route_code.to_string(),
            RouteStaging {
                code: route_code.to_string(),
                display_name: display_name.to_string(),
                running_days,
                comfort: comfort.unwrap_or(0.0),
                fare_per_km: fare_per_km.unwrap_or(DEFAULT_FARE_PER_KM),
                stop_times: Vec::new(),
                stops: Vec::new(),
            },
        );
    }

    /// Registers one stop-time record: `route_code` at `position` serves
    /// `stop_id` with the given (possibly absent) arrival/departure.
    pub fn add_stop_time(
        &mut self,
        route_code: &str,
        stop: StopId,
        position: usize,
        arrival: Option<i64>,
        departure: Option<i64>,
        day_offset: i64,
    ) -> EngineResult<()> {
        let staging = self.routes.get_mut(route_code).ok_or_else(|| {
            EngineError::IndexError(format!(
                "stop-time references unknown route '{route_code}'"
            ))
        })?;
        if staging.stop_times.len() <= position {
            staging.stop_times.resize(position + 1, None);
            staging.stops.resize(position + 1, None);
        }
        if staging.stop_times[position].is_some() {
            return Err(EngineError::IndexError(format!(
                "duplicate stop-time at route '{route_code}' position {position}"
            )));
        }
        staging.stop_times[position] = Some(StopTime {
            arrival,
            departure,
            day_offset,
        });
        staging.stops[position] = Some(stop);
        Ok(())
    }

    /// Validates the timetable's structural invariants and materializes
    /// the immutable index. Any violation is an `IndexError` — a broken
    /// timetable is a bug in the builder's caller, not a query-time 4xx.
    pub fn build(self) -> EngineResult<TimetableIndex> {
        let num_stops = self.stops.len();
        let mut routes = Vec::with_capacity(self.route_order.len());
        let mut route_stop_times = Vec::with_capacity(self.route_order.len());
        let mut stop_routes: Vec<Vec<(RouteId, usize)>> = vec![Vec::new(); num_stops];
        let mut position_index = HashMap::new();

        for (route_idx, code) in self.route_order.iter().enumerate() {
            let route_id = RouteId(route_idx as u32);
            let staging = self
                .routes
                .get(code)
                .expect("route_order entries are always present in routes map");

            let mut stops = Vec::with_capacity(staging.stops.len());
            let mut seen = HashSet::with_capacity(staging.stops.len());
            for (position, maybe_stop) in staging.stops.iter().enumerate() {
                let stop = maybe_stop.ok_or_else(|| {
                    EngineError::IndexError(format!(
                        "route '{code}' is missing a stop-time at position {position}"
                    ))
                })?;
                if !seen.insert(stop) {
                    return Err(EngineError::IndexError(format!(
                        "route '{code}' visits stop {stop} more than once"
                    )));
                }
                stops.push(stop);
                position_index.insert((route_id, stop), position);
                stop_routes[stop.index()].push((route_id, position));
            }

            let mut stop_times = Vec::with_capacity(staging.stop_times.len());
            let mut last_absolute: Option<i64> = None;
            for (position, maybe_st) in staging.stop_times.iter().enumerate() {
                let st = maybe_st.ok_or_else(|| {
                    EngineError::IndexError(format!(
                        "route '{code}' is missing a stop-time at position {position}"
                    ))
                })?;
                if let (Some(arr), Some(dep)) = (st.arrival, st.departure) {
                    if arr + 1440 * st.day_offset > dep + 1440 * st.day_offset {
                        return Err(EngineError::IndexError(format!(
                            "route '{code}' position {position} departs before it arrives"
                        )));
                    }
                }
                let absolute = st.absolute_arrival().or(st.absolute_departure());
                if let (Some(prev), Some(cur)) = (last_absolute, absolute) {
                    if cur < prev {
                        return Err(EngineError::IndexError(format!(
                            "route '{code}' stop-times are not non-decreasing at position {position}"
                        )));
                    }
                }
                if absolute.is_some() {
                    last_absolute = absolute;
                }
                stop_times.push(st);
            }

            routes.push(Route {
                code: staging.code.clone(),
                display_name: staging.display_name.clone(),
                running_days: staging.running_days,
                comfort: staging.comfort,
                fare_per_km: staging.fare_per_km,
                stops,
            });
            route_stop_times.push(stop_times);
        }

        log::info!(
            "timetable index built: {} stops, {} routes",
            num_stops,
            routes.len()
        );

        Ok(TimetableIndex {
            stops: self.stops,
            routes,
            route_stop_times,
            stop_routes,
            position_index,
            code_to_stop: self.code_to_stop,
        })
    }
}
