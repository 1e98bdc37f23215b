//! Fitness of a complete timetable.

use super::evaluator::{EvalError, TravelTimeEvaluator};
use crate::network::{Time, Traveller};
use crate::timetable::{ScheduleSet, TimeExpandedGraph, TrainRoute};
use tracing::trace;

/// Scores a [`ScheduleSet`]. Lower is better.
///
/// The optimizer only ever sees this trait, so any scoring function over
/// a full schedule set can be plugged in.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: the optimizer scores candidates
/// in parallel.
pub trait ScheduleFitness: Send + Sync {
    /// Scores one schedule set.
    fn fitness(&self, schedules: &ScheduleSet) -> Result<f64, EvalError>;

    /// Builds the schedule set for `routes` and scores it.
    fn fitness_of_routes(&self, routes: &[TrainRoute]) -> Result<f64, EvalError> {
        let schedules = ScheduleSet::from_routes(routes)?;
        self.fitness(&schedules)
    }
}

/// Mean traveller travel time under the periodic timetable.
///
/// Each call builds a fresh [`TimeExpandedGraph`] for the schedule set,
/// runs one earliest-arrival search per traveller and discards the graph.
/// Unreachable travellers count as
/// [`UNREACHABLE_COST`](super::UNREACHABLE_COST).
#[derive(Debug, Clone, Copy)]
pub struct AverageTravelTime<'a> {
    travellers: &'a [Traveller],
}

impl<'a> AverageTravelTime<'a> {
    pub fn new(travellers: &'a [Traveller]) -> Self {
        Self { travellers }
    }

    pub fn travellers(&self) -> &'a [Traveller] {
        self.travellers
    }
}

impl ScheduleFitness for AverageTravelTime<'_> {
    fn fitness(&self, schedules: &ScheduleSet) -> Result<f64, EvalError> {
        average_travel_time(schedules, self.travellers)
    }
}

/// Mean travel time of `travellers` on `schedules`.
///
/// # Errors
/// [`EvalError::NoTravellers`] when `travellers` is empty.
pub fn average_travel_time(
    schedules: &ScheduleSet,
    travellers: &[Traveller],
) -> Result<f64, EvalError> {
    if travellers.is_empty() {
        return Err(EvalError::NoTravellers);
    }

    let graph = TimeExpandedGraph::build(schedules.schedules());
    let evaluator = TravelTimeEvaluator::new(&graph);

    let mut total: Time = 0;
    for traveller in travellers {
        total += evaluator.travel_time(traveller.origin, traveller.destination)?;
    }
    let mean = total as f64 / travellers.len() as f64;
    trace!(
        nodes = graph.node_count(),
        travellers = travellers.len(),
        mean,
        "scored schedule set"
    );
    Ok(mean)
}
