//! All-pairs cheapest composite paths (Floyd–Warshall).

use super::composite::CompositePath;
use crate::network::{CityId, Network, Time};
use std::sync::Arc;
use tracing::debug;

/// Failure to resolve the all-pairs table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Some ordered pair has no path: the topology has two or more
    /// components.
    #[error("network is disconnected: no path from {from} to {to}")]
    Disconnected { from: CityId, to: CityId },
}

/// Working cell of the Floyd–Warshall table.
///
/// `Unknown` is distinct from a zero-cost path.
#[derive(Debug, Clone)]
enum PathEntry {
    Unknown,
    Known(Arc<CompositePath>),
}

/// Cheapest composite path for every ordered pair of cities.
///
/// Fully resolved: construction fails if any pair is unreachable. Paths
/// are shared through `Arc`, so routes built from the table clone cheaply.
#[derive(Debug, Clone)]
pub struct PathTable {
    city_count: usize,
    // row-major: paths[from * city_count + to]
    paths: Vec<Arc<CompositePath>>,
}

impl PathTable {
    /// Computes the table for the network's current track adjacency.
    ///
    /// Tracks are cloned into the paths, so later rewiring of `network`
    /// leaves the table untouched.
    ///
    /// # Complexity
    /// O(n³) time, O(n²) paths.
    pub fn compute(network: &Network) -> Result<Self, PathError> {
        let n = network.cities().len();
        let mut dist = vec![PathEntry::Unknown; n * n];

        for city in network.cities() {
            let i = city.id.0;
            dist[i * n + i] = PathEntry::Known(Arc::new(CompositePath::identity(city.id)));
            for (neighbour, track) in network.neighbours(city.id) {
                if let Some(path) = CompositePath::single(track, city.id) {
                    dist[i * n + neighbour.0] = PathEntry::Known(Arc::new(path));
                }
            }
        }

        floyd_warshall(&mut dist, n);

        let mut paths = Vec::with_capacity(n * n);
        for (idx, entry) in dist.into_iter().enumerate() {
            match entry {
                PathEntry::Known(path) => paths.push(path),
                PathEntry::Unknown => {
                    return Err(PathError::Disconnected {
                        from: CityId(idx / n),
                        to: CityId(idx % n),
                    })
                }
            }
        }

        debug!(cities = n, "computed all-pairs composite paths");
        Ok(Self {
            city_count: n,
            paths,
        })
    }

    /// Number of cities covered by the table.
    pub fn city_count(&self) -> usize {
        self.city_count
    }

    /// All city ids in the table, ascending.
    pub fn cities(&self) -> impl Iterator<Item = CityId> + Clone {
        (0..self.city_count).map(CityId)
    }

    /// Cheapest path from `from` to `to`, or `None` for unknown cities.
    pub fn get(&self, from: CityId, to: CityId) -> Option<&Arc<CompositePath>> {
        if from.0 < self.city_count && to.0 < self.city_count {
            Some(&self.paths[from.0 * self.city_count + to.0])
        } else {
            None
        }
    }

    /// Cheapest path from `from` to `to`.
    ///
    /// # Panics
    /// Panics if either city is not in the table.
    pub fn path(&self, from: CityId, to: CityId) -> &Arc<CompositePath> {
        assert!(
            from.0 < self.city_count && to.0 < self.city_count,
            "city out of range for path table"
        );
        &self.paths[from.0 * self.city_count + to.0]
    }

    /// Cost of the cheapest path from `from` to `to`.
    ///
    /// # Panics
    /// Panics if either city is not in the table.
    pub fn distance(&self, from: CityId, to: CityId) -> Time {
        self.path(from, to).total_distance()
    }

    /// Every path in row-major order, including the identity diagonal.
    pub fn paths(&self) -> &[Arc<CompositePath>] {
        &self.paths
    }
}

/// Relaxes every `(i, j)` through every intermediate `k`.
///
/// A cell is replaced when the detour is strictly cheaper or the cell is
/// still unknown.
fn floyd_warshall(dist: &mut [PathEntry], n: usize) {
    for k in 0..n {
        for i in 0..n {
            let ik = match &dist[i * n + k] {
                PathEntry::Known(p) => Arc::clone(p),
                PathEntry::Unknown => continue,
            };
            for j in 0..n {
                let PathEntry::Known(kj) = &dist[k * n + j] else {
                    continue;
                };
                let through = ik.total_distance() + kj.total_distance();
                let improves = match &dist[i * n + j] {
                    PathEntry::Unknown => true,
                    PathEntry::Known(ij) => through < ij.total_distance(),
                };
                if improves {
                    let joined = Arc::new(ik.concat(kj));
                    dist[i * n + j] = PathEntry::Known(joined);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use proptest::prelude::*;

    fn triangle() -> Network {
        let mut b = NetworkBuilder::new();
        let c: Vec<CityId> = (0..3).map(|_| b.add_city(0.5).unwrap()).collect();
        b.add_track(c[0], c[1], 10).unwrap();
        b.add_track(c[1], c[2], 20).unwrap();
        b.add_track(c[0], c[2], 50).unwrap();
        b.build()
    }

    #[test]
    fn test_diagonal_is_identity() {
        let table = PathTable::compute(&triangle()).unwrap();
        for c in table.cities() {
            assert_eq!(table.distance(c, c), 0);
            assert!(table.path(c, c).is_identity());
        }
    }

    #[test]
    fn test_detour_beats_direct_track() {
        let table = PathTable::compute(&triangle()).unwrap();
        // 0 -> 1 -> 2 costs 30, cheaper than the direct 50 track.
        let p = table.path(CityId(0), CityId(2));
        assert_eq!(p.total_distance(), 30);
        assert_eq!(p.tracks().len(), 2);
        assert_eq!(table.distance(CityId(2), CityId(0)), 30);
    }

    #[test]
    fn test_disconnected_is_reported() {
        let mut b = NetworkBuilder::new();
        let c: Vec<CityId> = (0..4).map(|_| b.add_city(0.5).unwrap()).collect();
        b.add_track(c[0], c[1], 10).unwrap();
        b.add_track(c[2], c[3], 10).unwrap();
        let err = PathTable::compute(&b.build()).unwrap_err();
        assert_eq!(
            err,
            PathError::Disconnected {
                from: CityId(0),
                to: CityId(2)
            }
        );
    }

    #[test]
    fn test_snapshot_survives_rewiring() {
        let mut b = NetworkBuilder::new();
        let c: Vec<CityId> = (0..4).map(|_| b.add_city(0.5).unwrap()).collect();
        let moved = b.add_track(c[0], c[1], 10).unwrap();
        b.add_track(c[1], c[2], 10).unwrap();
        b.add_track(c[2], c[3], 10).unwrap();
        let mut net = b.build();

        let table = PathTable::compute(&net).unwrap();
        net.reconnect_track(moved, c[0], c[3]).unwrap();

        let snapshot = &table.path(c[0], c[1]).tracks()[0];
        assert_eq!(snapshot.id, moved);
        assert_eq!(snapshot.connects, (c[0], c[1]));
        assert_eq!(table.distance(c[0], c[3]), 30);
    }

    #[test]
    fn test_get_out_of_range() {
        let table = PathTable::compute(&triangle()).unwrap();
        assert!(table.get(CityId(0), CityId(3)).is_none());
        assert!(table.get(CityId(2), CityId(1)).is_some());
        assert_eq!(table.paths().len(), 9);
    }

    /// Ring of `n` cities plus arbitrary chords, so always connected.
    fn ring_with_chords(costs: &[i64], chords: &[(usize, usize, i64)]) -> Network {
        let n = costs.len();
        let mut b = NetworkBuilder::new();
        for _ in 0..n {
            b.add_city(0.5).unwrap();
        }
        for (i, &cost) in costs.iter().enumerate() {
            let _ = b.add_track(CityId(i), CityId((i + 1) % n), cost);
        }
        for &(a, c, cost) in chords {
            let _ = b.add_track(CityId(a % n), CityId(c % n), cost);
        }
        b.build()
    }

    proptest! {
        #[test]
        fn prop_triangle_inequality(
            costs in prop::collection::vec(0i64..100, 3..9),
            chords in prop::collection::vec((0usize..9, 0usize..9, 0i64..100), 0..8),
        ) {
            let table = PathTable::compute(&ring_with_chords(&costs, &chords)).unwrap();
            for i in table.cities() {
                prop_assert_eq!(table.distance(i, i), 0);
                for j in table.cities() {
                    let p = table.path(i, j);
                    prop_assert_eq!(p.start(), i);
                    prop_assert_eq!(p.end(), j);
                    let sum: Time = p.tracks().iter().map(|t| t.cost).sum();
                    prop_assert_eq!(sum, p.total_distance());
                    prop_assert_eq!(table.distance(i, j), table.distance(j, i));
                    for k in table.cities() {
                        prop_assert!(
                            table.distance(i, j) <= table.distance(i, k) + table.distance(k, j)
                        );
                    }
                }
            }
        }
    }
}
