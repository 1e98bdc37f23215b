//! Periodic schedules and the time-expanded event graph.
//!
//! A [`TrainRoute`] (ordered composite legs) becomes a
//! [`PeriodicSchedule`]: the train runs the route forward, dwells, runs
//! it back, and repeats with period `P`. A [`ScheduleSet`] (one schedule
//! per train) becomes a [`TimeExpandedGraph`] whose nodes are recurring
//! departure/arrival events.

mod expanded;
mod route;
mod schedule;

pub use expanded::{Edge, EdgeKind, EventKind, EventNode, TimeExpandedGraph};
pub use route::{ScheduleSet, TrainRoute};
pub use schedule::{PeriodicSchedule, ScheduleError, Window, DWELL_TIME};
