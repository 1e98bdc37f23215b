//! Train routes and full-network schedule sets.

use super::schedule::{PeriodicSchedule, ScheduleError, DWELL_TIME};
use crate::network::{CityId, Time};
use crate::paths::CompositePath;
use std::sync::Arc;

/// The route one train shuttles along: contiguous composite legs.
///
/// This is the unit the optimizer mutates; [`to_schedule`](Self::to_schedule)
/// turns it into a timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRoute {
    pub is_express: bool,
    pub legs: Vec<Arc<CompositePath>>,
}

impl TrainRoute {
    pub fn new(is_express: bool, legs: Vec<Arc<CompositePath>>) -> Self {
        Self { is_express, legs }
    }

    /// Local (non-express) route.
    pub fn local(legs: Vec<Arc<CompositePath>>) -> Self {
        Self::new(false, legs)
    }

    pub fn first_city(&self) -> Option<CityId> {
        self.legs.first().map(|leg| leg.start())
    }

    pub fn last_city(&self) -> Option<CityId> {
        self.legs.last().map(|leg| leg.end())
    }

    /// Whether every leg starts where the previous one ends.
    pub fn is_contiguous(&self) -> bool {
        self.legs.windows(2).all(|w| w[0].end() == w[1].start())
    }

    /// Driven distance plus a dwell after every leg.
    pub fn length_with_dwell(&self) -> Time {
        self.legs
            .iter()
            .map(|leg| leg.total_distance() + DWELL_TIME)
            .sum()
    }

    pub fn to_schedule(&self) -> Result<PeriodicSchedule, ScheduleError> {
        PeriodicSchedule::new(self.is_express, self.legs.clone())
    }
}

/// One complete network timetable: a periodic schedule per train.
#[derive(Debug, Clone)]
pub struct ScheduleSet {
    schedules: Vec<PeriodicSchedule>,
}

impl ScheduleSet {
    pub fn new(schedules: Vec<PeriodicSchedule>) -> Self {
        Self { schedules }
    }

    /// Builds one schedule per route, preserving order.
    pub fn from_routes(routes: &[TrainRoute]) -> Result<Self, ScheduleError> {
        let schedules = routes
            .iter()
            .map(TrainRoute::to_schedule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { schedules })
    }

    pub fn schedules(&self) -> &[PeriodicSchedule] {
        &self.schedules
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
