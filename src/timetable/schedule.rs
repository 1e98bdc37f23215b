//! Periodic round-trip schedules.

use crate::network::{CityId, Time};
use crate::paths::CompositePath;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Fixed dwell cost added at every intermediate stop.
pub const DWELL_TIME: Time = 10;

/// Failure to build a schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("a train route needs at least one leg")]
    EmptyRoute,
}

/// A recurring departure/arrival window between two cities, relative to
/// the start of the schedule's period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub start: Time,
    pub end: Time,
}

impl Window {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

/// One train's timetable: it runs its route forward, then back, forever.
///
/// With `L = Σ leg.distance + DWELL_TIME · (legs − 1)` the period is
/// `P = 2 · (L + DWELL_TIME)`. A leg starting at cumulative offset `t`
/// with distance `d` contributes a forward window `(t, t + d)` and, for
/// the way back, a reverse window
/// `(2 · (L − t) + DWELL_TIME − d, 2 · (L − t) + DWELL_TIME)`.
#[derive(Debug, Clone)]
pub struct PeriodicSchedule {
    is_express: bool,
    route: Vec<Arc<CompositePath>>,
    route_length: Time,
    windows: BTreeMap<CityId, BTreeMap<CityId, Vec<Window>>>,
}

impl PeriodicSchedule {
    /// Builds the schedule for `route` in a single pass.
    pub fn new(is_express: bool, route: Vec<Arc<CompositePath>>) -> Result<Self, ScheduleError> {
        if route.is_empty() {
            return Err(ScheduleError::EmptyRoute);
        }

        let driven: Time = route.iter().map(|leg| leg.total_distance()).sum();
        let route_length = driven + DWELL_TIME * (route.len() as Time - 1);

        let mut windows: BTreeMap<CityId, BTreeMap<CityId, Vec<Window>>> = BTreeMap::new();
        let mut offset = 0;
        for leg in &route {
            let d = leg.total_distance();
            let back = (route_length - offset) * 2 + DWELL_TIME;
            windows
                .entry(leg.start())
                .or_default()
                .entry(leg.end())
                .or_default()
                .push(Window::new(offset, offset + d));
            windows
                .entry(leg.end())
                .or_default()
                .entry(leg.start())
                .or_default()
                .push(Window::new(back - d, back));
            offset += DWELL_TIME + d;
        }

        Ok(Self {
            is_express,
            route,
            route_length,
            windows,
        })
    }

    pub fn is_express(&self) -> bool {
        self.is_express
    }

    pub fn route(&self) -> &[Arc<CompositePath>] {
        &self.route
    }

    /// One-way length including intermediate dwells.
    pub fn route_length(&self) -> Time {
        self.route_length
    }

    /// Full round-trip period `P`.
    pub fn period(&self) -> Time {
        2 * (self.route_length + DWELL_TIME)
    }

    /// Windows for travelling from `from` to `to`, in route order.
    pub fn windows(&self, from: CityId, to: CityId) -> &[Window] {
        self.windows
            .get(&from)
            .and_then(|m| m.get(&to))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every `(from, to, windows)` triple, ordered by city ids.
    pub fn window_pairs(&self) -> impl Iterator<Item = (CityId, CityId, &[Window])> + '_ {
        self.windows.iter().flat_map(|(&from, inner)| {
            inner
                .iter()
                .map(move |(&to, windows)| (from, to, windows.as_slice()))
        })
    }

    /// Cities the train stops at, ascending.
    pub fn cities(&self) -> impl Iterator<Item = CityId> + '_ {
        self.windows.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Track, TrackId};
    use proptest::prelude::*;

    fn leg(id: usize, from: usize, to: usize, cost: Time) -> Arc<CompositePath> {
        let track = Track {
            id: TrackId(id),
            cost,
            connects: (CityId(from), CityId(to)),
        };
        Arc::new(CompositePath::single(&track, CityId(from)).unwrap())
    }

    #[test]
    fn test_two_leg_forward_windows() {
        let s = PeriodicSchedule::new(false, vec![leg(0, 0, 1, 20), leg(1, 1, 2, 30)]).unwrap();
        assert_eq!(s.route_length(), 60);
        assert_eq!(s.period(), 140);
        assert_eq!(s.windows(CityId(0), CityId(1)), &[Window::new(0, 20)]);
        assert_eq!(s.windows(CityId(1), CityId(2)), &[Window::new(30, 60)]);
    }

    #[test]
    fn test_reverse_windows_reflect_offsets() {
        let s = PeriodicSchedule::new(false, vec![leg(0, 0, 1, 20), leg(1, 1, 2, 30)]).unwrap();
        // first leg: t = 0, d = 20 -> (2*60 + 10 - 20, 2*60 + 10)
        assert_eq!(s.windows(CityId(1), CityId(0)), &[Window::new(110, 130)]);
        // second leg: t = 30, d = 30 -> (2*30 + 10 - 30, 2*30 + 10)
        assert_eq!(s.windows(CityId(2), CityId(1)), &[Window::new(40, 70)]);
    }

    #[test]
    fn test_single_leg() {
        let s = PeriodicSchedule::new(true, vec![leg(0, 3, 4, 45)]).unwrap();
        assert!(s.is_express());
        assert_eq!(s.route_length(), 45);
        assert_eq!(s.period(), 110);
        assert_eq!(s.windows(CityId(3), CityId(4)), &[Window::new(0, 45)]);
        assert_eq!(s.windows(CityId(4), CityId(3)), &[Window::new(55, 100)]);
    }

    #[test]
    fn test_repeated_pair_accumulates() {
        // 0 -> 1 -> 0 visits the same pair in both directions twice.
        let s = PeriodicSchedule::new(false, vec![leg(0, 0, 1, 20), leg(0, 1, 0, 20)]).unwrap();
        assert_eq!(s.route_length(), 50);
        assert_eq!(s.windows(CityId(0), CityId(1)).len(), 2);
        assert_eq!(s.windows(CityId(1), CityId(0)).len(), 2);
    }

    #[test]
    fn test_identity_leg() {
        let s = PeriodicSchedule::new(false, vec![Arc::new(CompositePath::identity(CityId(2)))])
            .unwrap();
        assert_eq!(s.route_length(), 0);
        assert_eq!(s.period(), 20);
        assert_eq!(
            s.windows(CityId(2), CityId(2)),
            &[Window::new(0, 0), Window::new(10, 10)]
        );
    }

    #[test]
    fn test_empty_route_rejected() {
        assert_eq!(
            PeriodicSchedule::new(false, vec![]).unwrap_err(),
            ScheduleError::EmptyRoute
        );
    }

    proptest! {
        #[test]
        fn prop_windows_fit_inside_one_period(costs in proptest::collection::vec(0i64..200, 1..8)) {
            let route: Vec<_> = costs
                .iter()
                .enumerate()
                .map(|(i, &c)| leg(i, i, i + 1, c))
                .collect();
            let s = PeriodicSchedule::new(false, route).unwrap();
            let period = s.period();
            let mut count = 0;
            for (_, _, windows) in s.window_pairs() {
                for w in windows {
                    count += 1;
                    prop_assert!(w.start >= 0 && w.end < period, "{w:?} vs {period}");
                    prop_assert!(costs.contains(&w.duration()));
                }
            }
            prop_assert_eq!(count, 2 * costs.len());
        }
    }

    #[test]
    fn test_window_pairs_and_cities() {
        let s = PeriodicSchedule::new(false, vec![leg(0, 0, 1, 20), leg(1, 1, 2, 30)]).unwrap();
        let pairs: Vec<(CityId, CityId)> = s.window_pairs().map(|(a, b, _)| (a, b)).collect();
        assert_eq!(
            pairs,
            vec![
                (CityId(0), CityId(1)),
                (CityId(1), CityId(0)),
                (CityId(1), CityId(2)),
                (CityId(2), CityId(1)),
            ]
        );
        let cities: Vec<CityId> = s.cities().collect();
        assert_eq!(cities, vec![CityId(0), CityId(1), CityId(2)]);
        assert!(s.windows(CityId(0), CityId(2)).is_empty());
    }
}
