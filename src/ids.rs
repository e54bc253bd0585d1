//! Dense integer identifiers for stops and routes.
//!
//! Textual codes come in through [`crate::timetable::IndexBuilder`] and
//! [`crate::query::SearchRequest`]; everything inside the engine works off
//! a dense `u32`-backed newtype instead, so stop and route indices can't be
//! mixed up at a call site.

use std::fmt;

/// Dense identifier for a [`crate::timetable::Stop`]. Identifiers are
/// contiguous over `[0, N_stops)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopId(pub u32);

/// Dense identifier for a [`crate::timetable::Route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(pub u32);

impl StopId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl RouteId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stop#{}", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route#{}", self.0)
    }
}
