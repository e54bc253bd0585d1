//! End-to-end scenarios and cross-cutting properties, exercised through
//! the one public entry point ([`crate::query::search_journeys`]) against
//! synthetic timetables built with [`crate::testutil`].

#![cfg(test)]

use crate::cancel::CancellationToken;
use crate::error::EngineError;
use crate::query::{search_journeys, SearchRequest};
use crate::testutil::{build_index, RouteSpec, EVERY_DAY};

// 2026-07-27 is a Monday, 2026-07-28 a Tuesday (see calendar.rs tests).
const MONDAY: &str = "2026-07-27";
const TUESDAY: &str = "2026-07-28";

fn request<'a>(source: &'a str, dest: &'a str, date: &'a str, dep: &'a str, max_transfers: u32) -> SearchRequest<'a> {
    SearchRequest {
        source_code: source,
        dest_code: dest,
        service_date: date,
        earliest_dep_hhmm: dep,
        max_transfers,
        cancellation: None,
    }
}

/// Scenario 1 — single direct route.
#[test]
fn scenario_1_single_direct_route() {
    let index = build_index(
        &[("A", "A", None), ("B", "B", None), ("C", "C", None)],
        vec![RouteSpec::new(
            "R1",
            EVERY_DAY,
            4.0,
            vec![
                ("A", None, Some(600), 0),
                ("B", Some(660), Some(665), 0),
                ("C", Some(720), None, 0),
            ],
        )],
    );

    let itineraries = search_journeys(&index, &request("A", "C", MONDAY, "09:00", 0)).unwrap();
    assert_eq!(itineraries.len(), 1);
    let itinerary = &itineraries[0];
    assert_eq!(itinerary.segments.len(), 1);
    assert_eq!(itinerary.segments[0].departure, Some(600));
    assert_eq!(itinerary.segments[0].arrival, Some(720));
    assert_eq!(itinerary.transfers, 0);
    assert_eq!(itinerary.total_time, 120);
    assert_eq!(itinerary.comfort, 4.0);
}

/// Scenario 2 — calendar filter excludes the only route.
#[test]
fn scenario_2_calendar_filter_excludes_route() {
    let index = build_index(
        &[("A", "A", None), ("B", "B", None), ("C", "C", None)],
        vec![RouteSpec::new(
            "R1",
            0b000_0100, // Tuesday only (bit 2, 0 = Sunday).
            4.0,
            vec![
                ("A", None, Some(600), 0),
                ("B", Some(660), Some(665), 0),
                ("C", Some(720), None, 0),
            ],
        )],
    );

    let result = search_journeys(&index, &request("A", "C", MONDAY, "09:00", 0));
    assert_eq!(result, Err(EngineError::NoRoutes));

    // But it runs fine on the day it's scheduled for.
    let ok = search_journeys(&index, &request("A", "C", TUESDAY, "09:00", 0));
    assert!(ok.is_ok());
}

/// Scenario 3 — forced one-transfer journey.
#[test]
fn scenario_3_forced_transfer_with_sufficient_buffer() {
    let index = build_index(
        &[
            ("A", "A", None),
            ("B", "B", Some(30)),
            ("C", "C", None),
        ],
        vec![
            RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
                ("A", None, Some(500), 0),
                ("B", Some(560), None, 0),
            ]),
            RouteSpec::new("R2", EVERY_DAY, 5.0, vec![
                ("B", None, Some(600), 0),
                ("C", Some(700), None, 0),
            ]),
        ],
    );

    let itineraries = search_journeys(&index, &request("A", "C", MONDAY, "06:40", 1)).unwrap();
    assert_eq!(itineraries.len(), 1);
    let itinerary = &itineraries[0];
    assert_eq!(itinerary.segments.len(), 2);
    assert_eq!(itinerary.total_time, 200);
    assert_eq!(itinerary.transfers, 1);
    assert_eq!(itinerary.transfers_between.len(), 1);
    let transfer = itinerary.transfers_between[0];
    assert_eq!(transfer.buffer, 40);
    assert!(transfer.sufficient);
}

/// Scenario 4 — transfer rejected by buffer.
#[test]
fn scenario_4_transfer_rejected_by_buffer() {
    let index = build_index(
        &[
            ("A", "A", None),
            ("B", "B", Some(30)),
            ("C", "C", None),
        ],
        vec![
            RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
                ("A", None, Some(500), 0),
                ("B", Some(560), None, 0),
            ]),
            RouteSpec::new("R2", EVERY_DAY, 5.0, vec![
                ("B", None, Some(580), 0),
                ("C", Some(700), None, 0),
            ]),
        ],
    );

    let result = search_journeys(&index, &request("A", "C", MONDAY, "06:40", 1));
    assert_eq!(result, Err(EngineError::NoRoutes));
}

/// Scenario 5 — Pareto frontier keeps both fast-uncomfortable and
/// slow-comfortable direct routes.
#[test]
fn scenario_5_pareto_frontier_keeps_incomparable_labels() {
    let index = build_index(
        &[("A", "A", None), ("C", "C", None)],
        vec![
            RouteSpec::new("FAST", EVERY_DAY, 3.0, vec![
                ("A", None, Some(600), 0),
                ("C", Some(650), None, 0),
            ]),
            RouteSpec::new("SLOW", EVERY_DAY, 9.0, vec![
                ("A", None, Some(600), 0),
                ("C", Some(700), None, 0),
            ]),
        ],
    );

    let itineraries = search_journeys(&index, &request("A", "C", MONDAY, "00:00", 0)).unwrap();
    assert_eq!(itineraries.len(), 2);
    let mut comforts: Vec<f64> = itineraries.iter().map(|it| it.comfort).collect();
    comforts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(comforts, vec![3.0, 9.0]);
}

/// Scenario 6 — source == destination yields NoRoutes rather than a
/// degenerate itinerary.
#[test]
fn scenario_6_source_equals_destination_is_no_routes() {
    let index = build_index(
        &[("A", "A", None), ("B", "B", None)],
        vec![RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
            ("A", None, Some(500), 0),
            ("B", Some(560), None, 0),
        ])],
    );

    let result = search_journeys(&index, &request("A", "A", MONDAY, "00:00", 0));
    assert_eq!(result, Err(EngineError::NoRoutes));
}

#[test]
fn unknown_stop_is_surfaced() {
    let index = build_index(&[("A", "A", None)], vec![]);
    let result = search_journeys(&index, &request("A", "ZZZ", MONDAY, "09:00", 0));
    assert_eq!(result, Err(EngineError::UnknownStop("ZZZ".to_string())));
}

#[test]
fn invalid_date_is_surfaced() {
    let index = build_index(&[("A", "A", None), ("B", "B", None)], vec![]);
    let result = search_journeys(&index, &request("A", "B", "not-a-date", "09:00", 0));
    assert_eq!(result, Err(EngineError::InvalidDate("not-a-date".to_string())));
}

#[test]
fn invalid_time_is_surfaced() {
    let index = build_index(&[("A", "A", None), ("B", "B", None)], vec![]);
    let result = search_journeys(&index, &request("A", "B", MONDAY, "25:00", 0));
    assert!(matches!(result, Err(EngineError::InvalidTime(_))));
}

#[test]
fn max_transfers_out_of_range_is_invalid_input() {
    let index = build_index(&[("A", "A", None), ("B", "B", None)], vec![]);
    let result = search_journeys(&index, &request("A", "B", MONDAY, "09:00", 11));
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));
}

/// Idempotence: running the same query twice yields the same itineraries.
#[test]
fn idempotent_search() {
    let index = build_index(
        &[
            ("A", "A", None),
            ("B", "B", Some(30)),
            ("C", "C", None),
        ],
        vec![
            RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
                ("A", None, Some(500), 0),
                ("B", Some(560), None, 0),
            ]),
            RouteSpec::new("R2", EVERY_DAY, 5.0, vec![
                ("B", None, Some(600), 0),
                ("C", Some(700), None, 0),
            ]),
        ],
    );

    let req = request("A", "C", MONDAY, "06:40", 1);
    let first = search_journeys(&index, &req).unwrap();
    let second = search_journeys(&index, &req).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.total_time, b.total_time);
        assert_eq!(a.transfers, b.transfers);
        assert_eq!(a.comfort, b.comfort);
    }
}

/// Monotonicity: a journey reachable with K-1 transfers is still present
/// (non-dominated) once K transfers are allowed.
#[test]
fn monotonic_in_max_transfers() {
    let index = build_index(
        &[
            ("A", "A", None),
            ("B", "B", Some(30)),
            ("C", "C", None),
        ],
        vec![
            RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
                ("A", None, Some(500), 0),
                ("B", Some(560), None, 0),
            ]),
            RouteSpec::new("R2", EVERY_DAY, 5.0, vec![
                ("B", None, Some(600), 0),
                ("C", Some(700), None, 0),
            ]),
        ],
    );

    let fewer = search_journeys(&index, &request("A", "C", MONDAY, "06:40", 1)).unwrap();
    let more = search_journeys(&index, &request("A", "C", MONDAY, "06:40", 2)).unwrap();
    assert!(more.len() >= fewer.len());
    for itinerary in &fewer {
        assert!(more
            .iter()
            .any(|other| other.total_time == itinerary.total_time && other.transfers == itinerary.transfers));
    }
}

/// Running-day law: every route in a returned itinerary runs on the
/// query's weekday.
#[test]
fn running_day_law_holds() {
    let index = build_index(
        &[("A", "A", None), ("B", "B", None)],
        vec![RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
            ("A", None, Some(500), 0),
            ("B", Some(560), None, 0),
        ])],
    );
    let itineraries = search_journeys(&index, &request("A", "B", MONDAY, "00:00", 0)).unwrap();
    for itinerary in &itineraries {
        for segment in &itinerary.segments {
            assert_eq!(index.running_days(segment.route) & 0b111_1111, EVERY_DAY);
        }
    }
}

/// Reconstruction round-trip: the first segment boards at the source and
/// the last alights at the destination.
#[test]
fn reconstruction_round_trips_to_endpoints() {
    let index = build_index(
        &[
            ("A", "A", None),
            ("B", "B", Some(30)),
            ("C", "C", None),
        ],
        vec![
            RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
                ("A", None, Some(500), 0),
                ("B", Some(560), None, 0),
            ]),
            RouteSpec::new("R2", EVERY_DAY, 5.0, vec![
                ("B", None, Some(600), 0),
                ("C", Some(700), None, 0),
            ]),
        ],
    );
    let itineraries = search_journeys(&index, &request("A", "C", MONDAY, "06:40", 1)).unwrap();
    let a = index.resolve_stop("A").unwrap();
    let c = index.resolve_stop("C").unwrap();
    for itinerary in &itineraries {
        assert_eq!(itinerary.segments.first().unwrap().board_stop, a);
        assert_eq!(itinerary.segments.last().unwrap().alight_stop, c);
    }
}

#[test]
fn cancellation_stops_the_search() {
    let index = build_index(
        &[
            ("A", "A", None),
            ("B", "B", Some(30)),
            ("C", "C", None),
        ],
        vec![
            RouteSpec::new("R1", EVERY_DAY, 5.0, vec![
                ("A", None, Some(500), 0),
                ("B", Some(560), None, 0),
            ]),
            RouteSpec::new("R2", EVERY_DAY, 5.0, vec![
                ("B", None, Some(600), 0),
                ("C", Some(700), None, 0),
            ]),
        ],
    );

    let token = CancellationToken::new();
    token.cancel();
    let req = SearchRequest {
        source_code: "A",
        dest_code: "C",
        service_date: MONDAY,
        earliest_dep_hhmm: "06:40",
        max_transfers: 1,
        cancellation: Some(token),
    };
    assert_eq!(search_journeys(&index, &req), Err(EngineError::Cancelled));
}
