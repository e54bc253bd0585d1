use raptor_core::{search_journeys, IndexBuilder, SearchRequest};

// A tiny three-stop, one-transfer network, built by hand the way a caller
// that already has its own timetable store would feed IndexBuilder.
fn main() {
    env_logger::init();

    let mut builder = IndexBuilder::new();
    let a = builder.add_stop("A", "Start", None);
    let b = builder.add_stop("B", "Interchange", Some(30));
    let c = builder.add_stop("C", "End", None);

    const EVERY_DAY: u8 = 0b111_1111;

    builder.add_route("R1", "Red Line", EVERY_DAY, Some(5.0), None);
    builder.add_stop_time("R1", a, 0, None, Some(500), 0).unwrap();
    builder.add_stop_time("R1", b, 1, Some(560), None, 0).unwrap();

    builder.add_route("R2", "Blue Line", EVERY_DAY, Some(8.0), None);
    builder.add_stop_time("R2", b, 0, None, Some(600), 0).unwrap();
    builder.add_stop_time("R2", c, 1, Some(700), None, 0).unwrap();

    let index = builder.build().expect("well-formed demo timetable");

    let request = SearchRequest {
        source_code: "A",
        dest_code: "C",
        service_date: "2026-07-27", // a Monday
        earliest_dep_hhmm: "06:40",
        max_transfers: 1,
        cancellation: None,
    };

    match search_journeys(&index, &request) {
        Ok(itineraries) => {
            for itinerary in itineraries {
                println!("{itinerary}");
            }
        }
        Err(err) => println!("No journey found: {err}"),
    }
}
