//! Cheapest-insertion tour and its split into train routes.

use super::config::InsertionConfig;
use crate::network::{CityId, Network, Time};
use crate::paths::{CompositePath, PathTable};
use crate::timetable::{TrainRoute, DWELL_TIME};
use std::sync::Arc;
use tracing::debug;

/// Failures of the insertion schedule builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertionError {
    #[error("invalid insertion configuration: {0}")]
    InvalidConfig(String),

    #[error("an insertion tour needs at least two distinct cities, got {0}")]
    TooFewCities(usize),

    #[error("a tour of {legs} legs cannot give each of {trains} trains a leg")]
    NotEnoughLegs { legs: usize, trains: usize },

    #[error("no path from {from} to {to} in the path table")]
    MissingPath { from: CityId, to: CityId },
}

/// Builds the full heuristic timetable for `network`: express trains over
/// the popular-city tour first, then local trains over the all-city tour.
///
/// # Errors
/// Fails when a requested train family has fewer than two cities to
/// visit or a tour too short to give every train a leg.
pub fn build_insertion_schedule(
    network: &Network,
    table: &PathTable,
    config: &InsertionConfig,
) -> Result<Vec<TrainRoute>, InsertionError> {
    config.validate().map_err(InsertionError::InvalidConfig)?;
    let mut routes = Vec::with_capacity(config.train_count());

    if config.intercities > 0 {
        let popular: Vec<CityId> = network
            .cities()
            .iter()
            .filter(|c| c.is_popular())
            .map(|c| c.id)
            .collect();
        let tour = cheapest_insertion_tour(table, &popular)?;
        debug!(cities = popular.len(), legs = tour.len(), "intercity tour built");
        routes.extend(split_tour(&tour, config.intercities, true)?);
    }

    if config.sprinters > 0 {
        let all: Vec<CityId> = network.cities().iter().map(|c| c.id).collect();
        let tour = cheapest_insertion_tour(table, &all)?;
        debug!(cities = all.len(), legs = tour.len(), "sprinter tour built");
        routes.extend(split_tour(&tour, config.sprinters, false)?);
    }

    Ok(routes)
}

/// Open tour through `cities` built by cheapest insertion.
///
/// Starts from the most distant pair, then repeatedly inserts the city
/// with the smallest detour `d(a, c) + d(c, b) + DWELL_TIME − d(a, b)`
/// into leg `(a, b)`. Ties go to the earlier leg, then the earlier city.
pub fn cheapest_insertion_tour(
    table: &PathTable,
    cities: &[CityId],
) -> Result<Vec<Arc<CompositePath>>, InsertionError> {
    let mut distinct: Vec<CityId> = Vec::with_capacity(cities.len());
    for &city in cities {
        if !distinct.contains(&city) {
            distinct.push(city);
        }
    }
    if distinct.len() < 2 {
        return Err(InsertionError::TooFewCities(distinct.len()));
    }

    let mut farthest: Option<(Time, CityId, CityId)> = None;
    for &a in &distinct {
        for &b in &distinct {
            if a == b {
                continue;
            }
            let d = lookup(table, a, b)?.total_distance();
            if farthest.map_or(true, |(best, _, _)| d > best) {
                farthest = Some((d, a, b));
            }
        }
    }
    let Some((_, a, b)) = farthest else {
        return Err(InsertionError::TooFewCities(distinct.len()));
    };

    let mut tour = vec![lookup(table, a, b)?.clone()];
    let mut remaining: Vec<CityId> = distinct.into_iter().filter(|&c| c != a && c != b).collect();

    while !remaining.is_empty() {
        // (detour, leg index, remaining index)
        let mut cheapest: Option<(Time, usize, usize)> = None;
        for (li, leg) in tour.iter().enumerate() {
            for (ci, &c) in remaining.iter().enumerate() {
                let detour = lookup(table, leg.start(), c)?.total_distance()
                    + lookup(table, c, leg.end())?.total_distance()
                    + DWELL_TIME
                    - leg.total_distance();
                if cheapest.map_or(true, |(best, _, _)| detour < best) {
                    cheapest = Some((detour, li, ci));
                }
            }
        }
        let Some((_, li, ci)) = cheapest else {
            break;
        };
        let city = remaining.remove(ci);
        let (start, end) = (tour[li].start(), tour[li].end());
        let first = lookup(table, start, city)?.clone();
        let second = lookup(table, city, end)?.clone();
        tour.splice(li..=li, [first, second]);
    }

    Ok(tour)
}

/// Cuts `tour` into `trains` consecutive routes of roughly equal length.
///
/// With `total = Σ (leg + DWELL_TIME)` and `target = ⌊total / trains⌋`,
/// train `k` (1-based) takes legs until the running length reaches
/// `k · target`. Every train gets at least one leg, and the last train
/// also takes whatever the rounding left over.
pub fn split_tour(
    tour: &[Arc<CompositePath>],
    trains: usize,
    is_express: bool,
) -> Result<Vec<TrainRoute>, InsertionError> {
    if trains == 0 {
        return Ok(Vec::new());
    }
    if tour.len() < trains {
        return Err(InsertionError::NotEnoughLegs {
            legs: tour.len(),
            trains,
        });
    }

    let total: Time = tour.iter().map(|leg| leg.total_distance() + DWELL_TIME).sum();
    let target = total / trains as Time;

    let mut routes = Vec::with_capacity(trains);
    let mut covered: Time = 0;
    let mut next = 0;
    for k in 1..=trains {
        let quota = k as Time * target;
        // legs that must stay available for the trains after this one
        let limit = tour.len() - (trains - k);
        let mut legs = Vec::new();
        while next < limit && (legs.is_empty() || covered < quota) {
            covered += tour[next].total_distance() + DWELL_TIME;
            legs.push(tour[next].clone());
            next += 1;
        }
        if k == trains {
            legs.extend(tour[next..].iter().cloned());
        }
        routes.push(TrainRoute::new(is_express, legs));
    }
    Ok(routes)
}

fn lookup(
    table: &PathTable,
    from: CityId,
    to: CityId,
) -> Result<&Arc<CompositePath>, InsertionError> {
    table
        .get(from, to)
        .ok_or(InsertionError::MissingPath { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    /// Line 0 - 1 - 2 - 3 with tracks of cost 30; cities 0 and 3 popular.
    fn line_network() -> Network {
        let mut b = NetworkBuilder::new();
        let pops = [0.95, 0.1, 0.2, 0.99];
        let c: Vec<CityId> = pops.iter().map(|&p| b.add_city(p).unwrap()).collect();
        for w in c.windows(2) {
            b.add_track(w[0], w[1], 30).unwrap();
        }
        b.build()
    }

    fn stops(route: &TrainRoute) -> Vec<usize> {
        let mut out = vec![route.legs[0].start().0];
        out.extend(route.legs.iter().map(|l| l.end().0));
        out
    }

    #[test]
    fn test_tour_visits_line_in_order() {
        let table = PathTable::compute(&line_network()).unwrap();
        let all: Vec<CityId> = (0..4).map(CityId).collect();
        let tour = cheapest_insertion_tour(&table, &all).unwrap();
        let cities: Vec<usize> = std::iter::once(tour[0].start().0)
            .chain(tour.iter().map(|l| l.end().0))
            .collect();
        assert_eq!(cities, vec![0, 1, 2, 3]);
        assert!(tour.windows(2).all(|w| w[0].end() == w[1].start()));
    }

    #[test]
    fn test_tour_needs_two_cities() {
        let table = PathTable::compute(&line_network()).unwrap();
        assert_eq!(
            cheapest_insertion_tour(&table, &[CityId(2)]).unwrap_err(),
            InsertionError::TooFewCities(1)
        );
        assert_eq!(
            cheapest_insertion_tour(&table, &[CityId(2), CityId(2)]).unwrap_err(),
            InsertionError::TooFewCities(1)
        );
    }

    #[test]
    fn test_split_even_lengths() {
        let table = PathTable::compute(&line_network()).unwrap();
        let all: Vec<CityId> = (0..4).map(CityId).collect();
        let tour = cheapest_insertion_tour(&table, &all).unwrap();

        let three = split_tour(&tour, 3, false).unwrap();
        assert_eq!(three.len(), 3);
        assert!(three.iter().all(|r| r.legs.len() == 1));

        // total 120, target 60: first train needs two legs to reach 60
        let two = split_tour(&tour, 2, false).unwrap();
        assert_eq!(stops(&two[0]), vec![0, 1, 2]);
        assert_eq!(stops(&two[1]), vec![2, 3]);
    }

    #[test]
    fn test_split_gives_every_train_a_leg() {
        let table = PathTable::compute(&line_network()).unwrap();
        let long = table.path(CityId(0), CityId(3)).clone();
        let short = table.path(CityId(3), CityId(2)).clone();
        let back = table.path(CityId(2), CityId(3)).clone();
        let routes = split_tour(&[long, short, back], 3, true).unwrap();
        assert!(routes.iter().all(|r| r.legs.len() == 1 && r.is_express));
    }

    #[test]
    fn test_split_rejects_short_tour() {
        let table = PathTable::compute(&line_network()).unwrap();
        let tour = vec![table.path(CityId(0), CityId(1)).clone()];
        assert_eq!(
            split_tour(&tour, 2, false).unwrap_err(),
            InsertionError::NotEnoughLegs { legs: 1, trains: 2 }
        );
        assert!(split_tour(&tour, 0, false).unwrap().is_empty());
    }

    #[test]
    fn test_full_schedule_express_first() {
        let network = line_network();
        let table = PathTable::compute(&network).unwrap();
        let config = InsertionConfig::default()
            .with_intercities(1)
            .with_sprinters(2);
        let routes = build_insertion_schedule(&network, &table, &config).unwrap();
        assert_eq!(routes.len(), 3);
        assert!(routes[0].is_express);
        assert_eq!(routes[0].legs.len(), 1);
        assert_eq!(routes[0].legs[0].total_distance(), 90);
        assert!(routes[1..].iter().all(|r| !r.is_express));
        assert!(routes.iter().all(TrainRoute::is_contiguous));
    }

    #[test]
    fn test_too_few_popular_cities() {
        let mut b = NetworkBuilder::new();
        let a = b.add_city(0.99).unwrap();
        let c = b.add_city(0.1).unwrap();
        b.add_track(a, c, 40).unwrap();
        let network = b.build();
        let table = PathTable::compute(&network).unwrap();
        let config = InsertionConfig::default()
            .with_intercities(1)
            .with_sprinters(1);
        assert_eq!(
            build_insertion_schedule(&network, &table, &config).unwrap_err(),
            InsertionError::TooFewCities(1)
        );
    }
}
