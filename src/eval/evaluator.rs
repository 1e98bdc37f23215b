//! Earliest-arrival search over the periodic time-expanded graph.
//!
//! The graph is conceptually infinite: canonical node `n` stands for the
//! occurrences `n.anchor_time + k · n.period` for every integer `k`. The
//! search runs Dijkstra over `(node, k)` pairs and resolves `k` for each
//! neighbour arithmetically:
//!
//! ```text
//! k = ceil((cost - anchor) / period)      -- first occurrence at or after cost
//! k += 1   if exact and the edge is a transfer
//! ```
//!
//! so a transfer never catches a departure leaving at the very instant of
//! arrival, while a ride edge (same trip) keeps its own occurrence.
//!
//! # Bounded expansion
//!
//! Every node identity is expanded at most `max_visits` times (default
//! [`MAX_VISITS`] = 2) and nodes already popped that often are not
//! relaxed into again. This makes the search finite. The bound is an
//! empirical heuristic, not a proven optimality bound for every periodic
//! graph shape: with it the result is an upper bound on the true earliest
//! arrival.
//!
//! # Unreachable destinations
//!
//! When the queue drains without reaching the destination city the
//! traveller is charged [`UNREACHABLE_COST`]. This keeps the fitness total
//! and comparable; it is an approximation, not a correctness guarantee.

use crate::network::{CityId, NodeId, Time};
use crate::queue::{EmptyQueue, PriorityQueue};
use crate::timetable::{EdgeKind, EventNode, ScheduleError, TimeExpandedGraph};
use std::collections::{HashMap, HashSet};

/// Travel time charged when the destination is not reached.
pub const UNREACHABLE_COST: Time = 1_000_000_000;

/// Default per-node expansion cap.
pub const MAX_VISITS: u32 = 2;

/// Failures while scoring schedules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The search popped from a queue with no live entries.
    #[error("search invariant violated: {0}")]
    Queue(#[from] EmptyQueue),

    #[error("cannot average travel time over zero travellers")]
    NoTravellers,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// One concrete occurrence of a canonical node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Occurrence {
    node: NodeId,
    repetition: i64,
}

/// One event on a reconstructed journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyStep {
    pub node: NodeId,
    pub repetition: i64,
    /// Absolute time of this occurrence.
    pub time: Time,
}

/// Reconstructed earliest-arrival journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    /// Occurrences from the boarding departure to the first event at the
    /// destination city.
    pub path: Vec<JourneyStep>,
    /// Anchor time of the boarding departure (the scheduled pick-up).
    pub departure: Time,
    /// Absolute time of the first event at the destination city.
    pub arrival: Time,
}

impl Journey {
    /// Elapsed time from pick-up to arrival.
    pub fn travel_time(&self) -> Time {
        self.arrival - self.departure
    }
}

#[derive(Debug, Clone, Copy)]
struct Label {
    pred: Option<Occurrence>,
    // anchor time of the boarding departure this label descends from
    start: Time,
}

/// Per-traveller earliest-arrival search on one graph.
#[derive(Debug, Clone, Copy)]
pub struct TravelTimeEvaluator<'g> {
    graph: &'g TimeExpandedGraph,
    max_visits: u32,
}

impl<'g> TravelTimeEvaluator<'g> {
    pub fn new(graph: &'g TimeExpandedGraph) -> Self {
        Self {
            graph,
            max_visits: MAX_VISITS,
        }
    }

    /// Overrides the per-node expansion cap (minimum 1).
    pub fn with_max_visits(mut self, max_visits: u32) -> Self {
        self.max_visits = max_visits.max(1);
        self
    }

    /// Travel time from `origin` to `destination`, or
    /// [`UNREACHABLE_COST`] if the search does not reach it.
    pub fn travel_time(&self, origin: CityId, destination: CityId) -> Result<Time, EvalError> {
        Ok(self
            .journey(origin, destination)?
            .map_or(UNREACHABLE_COST, |j| j.travel_time()))
    }

    /// Earliest-arrival journey from `origin` to `destination`.
    ///
    /// Returns `Ok(None)` when the bounded search does not reach the
    /// destination city.
    pub fn journey(
        &self,
        origin: CityId,
        destination: CityId,
    ) -> Result<Option<Journey>, EvalError> {
        let graph = self.graph;
        let mut queue: PriorityQueue<Occurrence, Time> = PriorityQueue::new();
        let mut labels: HashMap<Occurrence, Label> = HashMap::new();
        let mut visits = vec![0u32; graph.node_count()];

        for &id in graph.departures_at(origin) {
            let node = graph.node(id);
            let seed = Occurrence {
                node: id,
                repetition: 0,
            };
            labels.insert(
                seed,
                Label {
                    pred: None,
                    start: node.anchor_time,
                },
            );
            queue.insert(seed, node.anchor_time);
        }

        // Popped occurrences; their labels are final.
        let mut settled = HashSet::new();

        while !queue.is_empty() {
            let (current, cost) = queue.pop()?;
            settled.insert(current);
            let node = graph.node(current.node);
            visits[current.node.0] += 1;

            if node.city == destination {
                return Ok(Some(trace(graph, current, cost, &labels)));
            }
            if visits[current.node.0] > self.max_visits {
                continue;
            }
            let start = labels.get(&current).map_or(cost, |l| l.start);

            for edge in graph.edges(current.node) {
                if visits[edge.target.0] >= self.max_visits {
                    continue;
                }
                let next = graph.node(edge.target);
                let repetition = next_repetition(cost, next, edge.kind);
                let occurrence = Occurrence {
                    node: edge.target,
                    repetition,
                };
                if settled.contains(&occurrence) {
                    continue;
                }

                if let Some(label) = labels.get_mut(&occurrence) {
                    // Same occurrence, same time: prefer the later boarding.
                    if start > label.start {
                        *label = Label {
                            pred: Some(current),
                            start,
                        };
                    }
                    continue;
                }
                labels.insert(
                    occurrence,
                    Label {
                        pred: Some(current),
                        start,
                    },
                );
                queue.modify(occurrence, next.occurrence(repetition));
            }
        }

        Ok(None)
    }
}

/// Smallest repetition of `next` reachable after `cost` along an edge of
/// `kind`.
fn next_repetition(cost: Time, next: &EventNode, kind: EdgeKind) -> i64 {
    let offset = cost - next.anchor_time;
    let quotient = offset.div_euclid(next.period);
    let exact = offset.rem_euclid(next.period) == 0;
    match (exact, kind) {
        (true, EdgeKind::Ride) => quotient,
        (true, EdgeKind::Transfer) => quotient + 1,
        (false, _) => quotient + 1,
    }
}

/// Walks predecessor labels back from `last` to the boarding departure.
fn trace(
    graph: &TimeExpandedGraph,
    last: Occurrence,
    arrival: Time,
    labels: &HashMap<Occurrence, Label>,
) -> Journey {
    let mut path = vec![last];
    let mut cursor = last;
    // Predecessor chains strictly shrink towards a seed; the bound only
    // guards against a corrupted label map.
    while path.len() <= labels.len() {
        match labels.get(&cursor).and_then(|l| l.pred) {
            Some(pred) => {
                path.push(pred);
                cursor = pred;
            }
            None => break,
        }
    }
    path.reverse();

    let departure = labels
        .get(&path[0])
        .map_or(arrival, |label| label.start);
    let path = path
        .into_iter()
        .map(|o| JourneyStep {
            node: o.node,
            repetition: o.repetition,
            time: graph.node(o.node).occurrence(o.repetition),
        })
        .collect();
    Journey {
        path,
        departure,
        arrival,
    }
}
