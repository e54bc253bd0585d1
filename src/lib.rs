//! Multi-criteria earliest-arrival journey queries over a scheduled
//! public-transport timetable, answered by a round-based (RAPTOR) engine.
//!
//! The crate is a pure function of an already-built [`TimetableIndex`]:
//! given a source stop, a destination stop, a service date, an earliest
//! departure time, and a bound on transfers, [`search_journeys`] returns
//! the set of itineraries that are simultaneously non-dominated on
//! arrival time, transfer count, and onboard comfort. Everything outside
//! that — the HTTP surface, request validation, timetable ingestion, the
//! station directory, logging/metrics wiring — is this crate's caller's
//! job, not its own.

pub mod calendar;
pub mod cancel;
pub mod error;
pub mod ids;
pub mod itinerary;
pub mod label;
pub mod query;
pub mod raptor;
pub mod timetable;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod testutil;

pub use cancel::CancellationToken;
pub use error::{EngineError, EngineResult};
pub use ids::{RouteId, StopId};
pub use itinerary::{Itinerary, Segment, Transfer};
pub use query::{search_journeys, SearchRequest, MAX_TRANSFERS_LIMIT};
pub use timetable::{IndexBuilder, TimetableIndex};
