//! Route mutation operators.
//!
//! Both operators keep a route contiguous: every leg is a shortest
//! composite path taken from the [`PathTable`], and new legs always start
//! where the previous leg ends.
//!
//! - [`insert_city`]: grow the route by one leg through a new city
//! - [`delete_leg`]: shrink the route by one leg
//!
//! A call that finds nothing valid to do (no eligible city, a single-leg
//! route for deletion) leaves the route unchanged and returns `false`.

use crate::network::CityId;
use crate::paths::{CompositePath, PathTable};
use crate::timetable::TrainRoute;
use rand::seq::index;
use rand::Rng;
use std::sync::Arc;

/// Mutates a copy of `routes`.
///
/// `ceil(share · routes.len())` distinct routes are picked uniformly; each
/// gets [`mutate_route`].
pub fn mutate_routes<R: Rng>(
    routes: &[TrainRoute],
    table: &PathTable,
    share: f64,
    insert_probability: f64,
    rng: &mut R,
) -> Vec<TrainRoute> {
    let mut child = routes.to_vec();
    let count = ((child.len() as f64 * share).ceil() as usize).min(child.len());
    for i in index::sample(rng, child.len(), count) {
        mutate_route(&mut child[i], table, insert_probability, rng);
    }
    child
}

/// Applies one insert or delete mutation.
///
/// Single-leg routes always insert; otherwise insert is chosen with
/// probability `insert_probability`.
pub fn mutate_route<R: Rng>(
    route: &mut TrainRoute,
    table: &PathTable,
    insert_probability: f64,
    rng: &mut R,
) -> bool {
    if route.legs.is_empty() {
        return false;
    }
    if route.legs.len() == 1 || rng.random_bool(insert_probability.clamp(0.0, 1.0)) {
        insert_city(route, table, rng)
    } else {
        delete_leg(route, table, rng)
    }
}

/// Splices a random city into the route.
///
/// The position is uniform over `legs.len() + 2` choices: before the first
/// leg, inside any leg, or after the last leg. The city is uniform over
/// cities that are not an endpoint of the affected leg.
pub fn insert_city<R: Rng>(route: &mut TrainRoute, table: &PathTable, rng: &mut R) -> bool {
    let n = route.legs.len();
    let (Some(first), Some(last)) = (route.first_city(), route.last_city()) else {
        return false;
    };
    let position = rng.random_range(0..n + 2);

    if position == 0 {
        let Some(city) = pick_city(table, &[first], rng) else {
            return false;
        };
        let Some(leg) = table.get(city, first) else {
            return false;
        };
        route.legs.insert(0, leg.clone());
    } else if position == n + 1 {
        let Some(city) = pick_city(table, &[last], rng) else {
            return false;
        };
        let Some(leg) = table.get(last, city) else {
            return false;
        };
        route.legs.push(leg.clone());
    } else {
        let i = position - 1;
        let (start, end) = (route.legs[i].start(), route.legs[i].end());
        let Some(city) = pick_city(table, &[start, end], rng) else {
            return false;
        };
        let (Some(to), Some(from)) = (table.get(start, city), table.get(city, end)) else {
            return false;
        };
        route.legs.splice(i..=i, [to.clone(), from.clone()]);
    }
    true
}

/// Removes one leg.
///
/// The position is uniform over `legs.len() + 1` boundaries: the first
/// and last drop the outer leg, an interior boundary `p` merges legs
/// `p - 1` and `p` into the shortest path between their outer ends.
pub fn delete_leg<R: Rng>(route: &mut TrainRoute, table: &PathTable, rng: &mut R) -> bool {
    let n = route.legs.len();
    if n < 2 {
        return false;
    }
    let position = rng.random_range(0..=n);

    if position == 0 {
        route.legs.remove(0);
    } else if position == n {
        route.legs.pop();
    } else {
        let Some(merged) = merged_leg(table, &route.legs[position - 1], &route.legs[position])
        else {
            return false;
        };
        route.legs.splice(position - 1..=position, [merged]);
    }
    true
}

fn merged_leg(
    table: &PathTable,
    before: &CompositePath,
    after: &CompositePath,
) -> Option<Arc<CompositePath>> {
    table.get(before.start(), after.end()).cloned()
}

fn pick_city<R: Rng>(table: &PathTable, excluded: &[CityId], rng: &mut R) -> Option<CityId> {
    let eligible: Vec<CityId> = table.cities().filter(|c| !excluded.contains(c)).collect();
    if eligible.is_empty() {
        None
    } else {
        Some(eligible[rng.random_range(0..eligible.len())])
    }
}
