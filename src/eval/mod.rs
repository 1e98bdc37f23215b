//! Travel-time evaluation of periodic timetables.
//!
//! # Key Types
//!
//! - [`TravelTimeEvaluator`]: earliest-arrival search for one traveller
//! - [`Journey`]: the reconstructed path with pick-up and arrival times
//! - [`ScheduleFitness`]: scoring seam used by the optimizer
//! - [`AverageTravelTime`]: mean travel time over all travellers
//!
//! # References
//!
//! - Dijkstra (1959), "A note on two problems in connexion with graphs"
//! - Pyrga, Schulz, Wagner & Zaroliagis (2008), "Efficient models for
//!   timetable information in public transportation systems"

mod evaluator;
mod fitness;

pub use evaluator::{
    EvalError, Journey, JourneyStep, TravelTimeEvaluator, MAX_VISITS, UNREACHABLE_COST,
};
pub use fitness::{average_travel_time, AverageTravelTime, ScheduleFitness};
