//! The label algebra and per-stop Pareto frontier.
//!
//! Labels are append-only and form a DAG of predecessor edges rooted at
//! one source label. Rather than share labels through reference-counted
//! pointers, every label produced by a query lives in one [`LabelArena`]
//! owned by that query and freed at query return
//! ([`crate::raptor::search`]) — a frontier is then just a `Vec<LabelId>`
//! of arena indices, and there's no lifetime bookkeeping per label at all.

use crate::ids::{RouteId, StopId};

/// Index into a [`LabelArena`]. Acyclic by construction: every label's
/// `transfers` is strictly greater than its predecessor's, so following
/// `predecessor` always terminates at the source label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(u32);

/// One point in the search: an arrival at a stop, with enough breadcrumbs
/// to reconstruct the journey that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Label {
    pub arrival: i64,
    pub transfers: u32,
    /// Dominance uses this label's own (final-leg) comfort value; see
    /// [`crate::itinerary`] for the separate, averaged journey-level
    /// comfort score computed at reconstruction time. The two measure
    /// different things and are kept distinct on purpose — do not unify
    /// them.
    pub comfort: f64,
    pub predecessor: Option<LabelId>,
    pub via_route: Option<RouteId>,
    pub board_stop: Option<StopId>,
    pub alight_stop: StopId,
}

impl Label {
    fn is_source(&self) -> bool {
        self.predecessor.is_none()
    }

    /// `self` dominates `other` iff it is no worse in every criterion and
    /// strictly better in at least one. Equal triples do not dominate
    /// each other.
    pub fn dominates(&self, other: &Label) -> bool {
        let no_worse = self.arrival <= other.arrival
            && self.transfers <= other.transfers
            && self.comfort >= other.comfort;
        let strictly_better = self.arrival < other.arrival
            || self.transfers < other.transfers
            || self.comfort > other.comfort;
        no_worse && strictly_better
    }
}

/// Query-scoped, append-only store of every label created during one
/// search. Discarded when the query returns.
#[derive(Default)]
pub struct LabelArena {
    labels: Vec<Label>,
}

impl LabelArena {
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn push(&mut self, label: Label) -> LabelId {
        let id = LabelId(self.labels.len() as u32);
        self.labels.push(label);
        id
    }

    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// The Pareto frontier at one stop: a set of arena indices, no member of
/// which dominates another.
#[derive(Default, Clone)]
pub struct Frontier {
    members: Vec<LabelId>,
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.members.iter().copied()
    }

    /// Returns an immutable snapshot of the labels currently on the
    /// frontier.
    pub fn snapshot(&self) -> Vec<LabelId> {
        self.members.clone()
    }

    /// Attempts to insert `candidate` (already pushed into `arena` as
    /// `candidate_id`). Returns `true` iff inserted.
    ///
    /// First checks domination by an existing member, then drops members
    /// the candidate itself dominates, then appends. Exact-duplicate
    /// labels are permitted but wasteful; we don't special-case them.
    pub fn try_insert(&mut self, arena: &LabelArena, candidate_id: LabelId) -> bool {
        let candidate = arena.get(candidate_id);

        if self
            .members
            .iter()
            .any(|&existing| arena.get(existing).dominates(candidate))
        {
            return false;
        }

        self.members
            .retain(|&existing| !candidate.dominates(arena.get(existing)));

        self.members.push(candidate_id);
        true
    }
}

/// Seeds a query: exactly one label at `source`, with `arrival =
/// departure_minute`, `transfers = 0`, `comfort = 0`, no predecessor.
pub fn seed(arena: &mut LabelArena, source: StopId, departure_minute: i64) -> (LabelId, Frontier) {
    let label = Label {
        arrival: departure_minute,
        transfers: 0,
        comfort: 0.0,
        predecessor: None,
        via_route: None,
        board_stop: None,
        alight_stop: source,
    };
    let id = arena.push(label);
    let mut frontier = Frontier::new();
    frontier.try_insert(arena, id);
    (id, frontier)
}
