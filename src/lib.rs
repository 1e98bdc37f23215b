//! Periodic train timetable evaluation and optimization.
//!
//! Given a network of cities joined by costed tracks and a population of
//! travellers, this crate scores a timetable (a set of trains shuttling
//! along fixed routes) by the average door-to-door travel time, and
//! searches for better timetables:
//!
//! - **Paths**: Floyd–Warshall all-pairs table of composite shortest
//!   paths; the building blocks of every train route.
//! - **Timetable**: round-trip periodic schedules and the time-expanded
//!   event graph they induce.
//! - **Evaluation**: earliest-arrival search over the periodic graph,
//!   resolving repeated occurrences arithmetically instead of unrolling
//!   time.
//! - **Optimization**: an elitist evolutionary loop with route
//!   insert/delete mutations, evaluated in parallel.
//! - **Insertion heuristic**: a constructive baseline, also usable as the
//!   optimizer's seed.
//!
//! # Architecture
//!
//! Data flows one way: [`network`] → [`paths`] → [`timetable`] →
//! [`eval`] → [`evo`]. The optimizer only depends on the
//! [`eval::ScheduleFitness`] trait, so any scoring function can be
//! plugged in. [`experiment`] wires the whole pipeline together.
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod eval;
pub mod evo;
pub mod experiment;
pub mod insertion;
pub mod network;
pub mod parallel;
pub mod paths;
pub mod queue;
pub mod random;
pub mod timetable;
