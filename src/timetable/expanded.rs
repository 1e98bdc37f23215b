//! Time-expanded event graph.
//!
//! Every window of every schedule becomes a departure node at its origin
//! city and an arrival node at its destination city, joined by a ride
//! edge. Each node is *canonical*: it stands for the whole series of
//! occurrences `anchor_time + k · period`, which the evaluator resolves
//! arithmetically instead of materializing copies.
//!
//! Transfer edges run from every arrival at a city to every departure at
//! that city. They are not stored per node: an arrival's transfer targets
//! are exactly the city's departure list, so [`TimeExpandedGraph::edges`]
//! yields them from that index.

use super::schedule::PeriodicSchedule;
use crate::network::{CityId, IdSequence, NodeId, Time};
use std::collections::BTreeMap;

/// Whether a node is a train leaving or reaching its city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Departure,
    Arrival,
}

/// Kind of edge between two event nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Same scheduled trip: departure to its matching arrival.
    Ride,
    /// Change (or stay) at a city: arrival to any departure there.
    Transfer,
}

/// Directed edge to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub kind: EdgeKind,
}

/// One canonical recurring event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNode {
    pub id: NodeId,
    pub kind: EventKind,
    /// Time of occurrence zero (the window start or end).
    pub anchor_time: Time,
    /// Period `P` of the owning schedule.
    pub period: Time,
    pub city: CityId,
    /// Matching arrival, for departure nodes.
    ride: Option<NodeId>,
}

impl EventNode {
    /// Absolute time of occurrence `repetition`.
    pub fn occurrence(&self, repetition: i64) -> Time {
        self.anchor_time + repetition * self.period
    }
}

/// Departure/arrival nodes of a full schedule set, indexed by city.
///
/// Built fresh for each fitness evaluation and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct TimeExpandedGraph {
    nodes: Vec<EventNode>,
    departures: BTreeMap<CityId, Vec<NodeId>>,
    arrivals: BTreeMap<CityId, Vec<NodeId>>,
}

impl TimeExpandedGraph {
    /// Builds the graph for `schedules`.
    ///
    /// Node ids come from a graph-local sequence, in schedule order, then
    /// city-pair order, then window order.
    pub fn build(schedules: &[PeriodicSchedule]) -> Self {
        let mut graph = Self::default();
        let mut ids = IdSequence::new();

        for schedule in schedules {
            let period = schedule.period();
            for (from, to, windows) in schedule.window_pairs() {
                for window in windows {
                    let departure = NodeId(ids.issue());
                    let arrival = NodeId(ids.issue());
                    graph.nodes.push(EventNode {
                        id: departure,
                        kind: EventKind::Departure,
                        anchor_time: window.start,
                        period,
                        city: from,
                        ride: Some(arrival),
                    });
                    graph.nodes.push(EventNode {
                        id: arrival,
                        kind: EventKind::Arrival,
                        anchor_time: window.end,
                        period,
                        city: to,
                        ride: None,
                    });
                    graph.departures.entry(from).or_default().push(departure);
                    graph.arrivals.entry(to).or_default().push(arrival);
                }
            }
        }
        graph
    }

    /// # Panics
    /// Panics if `id` was not issued by this graph.
    pub fn node(&self, id: NodeId) -> &EventNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[EventNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Departure nodes at `city`.
    pub fn departures_at(&self, city: CityId) -> &[NodeId] {
        self.departures
            .get(&city)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Arrival nodes at `city`.
    pub fn arrivals_at(&self, city: CityId) -> &[NodeId] {
        self.arrivals
            .get(&city)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Outgoing edges of `id`: one ride edge for a departure, one transfer
    /// edge per departure at the same city for an arrival.
    pub fn edges(&self, id: NodeId) -> impl Iterator<Item = Edge> + '_ {
        let node = self.node(id);
        let transfers = match node.kind {
            EventKind::Arrival => self.departures_at(node.city),
            EventKind::Departure => &[],
        };
        node.ride
            .map(|target| Edge {
                target,
                kind: EdgeKind::Ride,
            })
            .into_iter()
            .chain(transfers.iter().map(|&target| Edge {
                target,
                kind: EdgeKind::Transfer,
            }))
    }

    pub fn ride_edge_count(&self) -> usize {
        self.departures.values().map(Vec::len).sum()
    }

    pub fn transfer_edge_count(&self) -> usize {
        self.arrivals
            .iter()
            .map(|(city, arrivals)| arrivals.len() * self.departures_at(*city).len())
            .sum()
    }
}
