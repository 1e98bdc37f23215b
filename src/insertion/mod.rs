//! Constructive schedule builder based on cheapest insertion.
//!
//! Builds one open tour over a city subset with the classic cheapest
//! insertion rule (dwell time included in the detour), then cuts the tour
//! into consecutive train routes of similar length. Express trains cover
//! the popular cities, local trains cover every city.
//!
//! The result is a ready-to-score timetable and a natural seed for the
//! [`evo`](crate::evo) optimizer.
//!
//! # References
//!
//! - Rosenkrantz, Stearns & Lewis (1977), "An Analysis of Several
//!   Heuristics for the Traveling Salesman Problem"

mod builder;
mod config;

pub use builder::{build_insertion_schedule, cheapest_insertion_tour, split_tour, InsertionError};
pub use config::InsertionConfig;
