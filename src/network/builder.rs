//! Network construction and adjacency.

use super::ids::{CityId, IdSequence, TrackId, TravellerId};
use super::types::{City, Time, Track, Traveller};
use std::collections::BTreeMap;

/// Precondition failures while building or rewiring a network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("unknown city {0}")]
    UnknownCity(CityId),

    #[error("unknown track {0}")]
    UnknownTrack(TrackId),

    #[error("track would connect {0} to itself")]
    SelfLoop(CityId),

    #[error("cities {0} and {1} are already connected")]
    DuplicateConnection(CityId, CityId),

    #[error("track cost must be non-negative, got {0}")]
    NegativeCost(Time),

    #[error("popularity must lie in [0, 1], got {0}")]
    InvalidPopularity(f64),

    #[error("{city} is not an endpoint of {track}")]
    NotAnEndpoint { track: TrackId, city: CityId },

    #[error("traveller origin and destination are both {0}")]
    SameOriginDestination(CityId),
}

/// Incrementally assembles a [`Network`].
///
/// Owns the id sequences for cities, tracks and travellers, so ids are
/// dense and local to this network.
///
/// ```
/// use u_timetable::network::NetworkBuilder;
///
/// let mut builder = NetworkBuilder::new();
/// let a = builder.add_city(0.4).unwrap();
/// let b = builder.add_city(0.9).unwrap();
/// builder.add_track(a, b, 30).unwrap();
/// builder.add_traveller(a, b).unwrap();
/// let network = builder.build();
/// assert_eq!(network.cities().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    network: Network,
    track_ids: IdSequence,
    traveller_ids: IdSequence,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a city and returns its id.
    pub fn add_city(&mut self, popularity: f64) -> Result<CityId, NetworkError> {
        if !(0.0..=1.0).contains(&popularity) {
            return Err(NetworkError::InvalidPopularity(popularity));
        }
        let id = CityId(self.network.cities.len());
        self.network.cities.push(City { id, popularity });
        self.network.adjacency.push(BTreeMap::new());
        Ok(id)
    }

    /// Adds an undirected track between `a` and `b`.
    pub fn add_track(&mut self, a: CityId, b: CityId, cost: Time) -> Result<TrackId, NetworkError> {
        self.network.check_city(a)?;
        self.network.check_city(b)?;
        if a == b {
            return Err(NetworkError::SelfLoop(a));
        }
        if cost < 0 {
            return Err(NetworkError::NegativeCost(cost));
        }
        if self.network.are_connected(a, b) {
            return Err(NetworkError::DuplicateConnection(a, b));
        }
        let id = TrackId(self.track_ids.issue());
        self.network.tracks.push(Track {
            id,
            cost,
            connects: (a, b),
        });
        self.network.adjacency[a.0].insert(b, id);
        self.network.adjacency[b.0].insert(a, id);
        Ok(id)
    }

    /// Adds a traveller from `origin` to `destination`.
    pub fn add_traveller(
        &mut self,
        origin: CityId,
        destination: CityId,
    ) -> Result<TravellerId, NetworkError> {
        self.network.check_city(origin)?;
        self.network.check_city(destination)?;
        if origin == destination {
            return Err(NetworkError::SameOriginDestination(origin));
        }
        let id = TravellerId(self.traveller_ids.issue());
        self.network.travellers.push(Traveller {
            id,
            origin,
            destination,
        });
        Ok(id)
    }

    /// Read access to the network under construction.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutable access for rewiring during construction.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn build(self) -> Network {
        self.network
    }
}

/// Cities, tracks and travellers of one topology.
#[derive(Debug, Clone, Default)]
pub struct Network {
    cities: Vec<City>,
    tracks: Vec<Track>,
    travellers: Vec<Traveller>,
    // adjacency[c]: neighbour -> connecting track
    adjacency: Vec<BTreeMap<CityId, TrackId>>,
}

impl Network {
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn travellers(&self) -> &[Traveller] {
        &self.travellers
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id.0)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.0)
    }

    /// Neighbours of `city` with the connecting track, ordered by neighbour id.
    pub fn neighbours(&self, city: CityId) -> impl Iterator<Item = (CityId, &Track)> + '_ {
        self.adjacency
            .get(city.0)
            .into_iter()
            .flat_map(|m| m.iter())
            .map(move |(&n, &t)| (n, &self.tracks[t.0]))
    }

    /// Number of tracks touching `city`.
    pub fn degree(&self, city: CityId) -> usize {
        self.adjacency.get(city.0).map_or(0, BTreeMap::len)
    }

    pub fn are_connected(&self, a: CityId, b: CityId) -> bool {
        self.adjacency
            .get(a.0)
            .is_some_and(|m| m.contains_key(&b))
    }

    /// Moves the far endpoint of `track` (the one that is not `keep`) to
    /// `new_end`.
    pub fn reconnect_track(
        &mut self,
        track: TrackId,
        keep: CityId,
        new_end: CityId,
    ) -> Result<(), NetworkError> {
        self.check_city(new_end)?;
        let old_end = self
            .tracks
            .get(track.0)
            .ok_or(NetworkError::UnknownTrack(track))?
            .other_end(keep)
            .ok_or(NetworkError::NotAnEndpoint { track, city: keep })?;
        if new_end == keep {
            return Err(NetworkError::SelfLoop(keep));
        }
        if new_end == old_end {
            return Ok(());
        }
        if self.are_connected(keep, new_end) {
            return Err(NetworkError::DuplicateConnection(keep, new_end));
        }

        self.adjacency[keep.0].remove(&old_end);
        self.adjacency[old_end.0].remove(&keep);
        self.tracks[track.0].connects = (keep, new_end);
        self.adjacency[keep.0].insert(new_end, track);
        self.adjacency[new_end.0].insert(keep, track);
        Ok(())
    }

    fn check_city(&self, city: CityId) -> Result<(), NetworkError> {
        if city.0 < self.cities.len() {
            Ok(())
        } else {
            Err(NetworkError::UnknownCity(city))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> (Network, Vec<CityId>) {
        let mut b = NetworkBuilder::new();
        let ids: Vec<CityId> = (0..n).map(|_| b.add_city(0.5).unwrap()).collect();
        for w in ids.windows(2) {
            b.add_track(w[0], w[1], 10).unwrap();
        }
        (b.build(), ids)
    }

    #[test]
    fn test_dense_city_ids() {
        let (net, ids) = line(4);
        assert_eq!(ids, vec![CityId(0), CityId(1), CityId(2), CityId(3)]);
        assert_eq!(net.tracks().len(), 3);
    }

    #[test]
    fn test_neighbours() {
        let (net, ids) = line(3);
        let n: Vec<CityId> = net.neighbours(ids[1]).map(|(c, _)| c).collect();
        assert_eq!(n, vec![ids[0], ids[2]]);
        assert_eq!(net.degree(ids[0]), 1);
        assert!(net.are_connected(ids[1], ids[0]));
        assert!(!net.are_connected(ids[0], ids[2]));
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let mut b = NetworkBuilder::new();
        let a = b.add_city(0.1).unwrap();
        let c = b.add_city(0.2).unwrap();
        assert_eq!(b.add_track(a, a, 5), Err(NetworkError::SelfLoop(a)));
        assert_eq!(b.add_track(a, c, -1), Err(NetworkError::NegativeCost(-1)));
        assert_eq!(
            b.add_track(a, CityId(9), 5),
            Err(NetworkError::UnknownCity(CityId(9)))
        );
        b.add_track(a, c, 5).unwrap();
        assert_eq!(
            b.add_track(c, a, 7),
            Err(NetworkError::DuplicateConnection(c, a))
        );
        assert_eq!(
            b.add_traveller(a, a),
            Err(NetworkError::SameOriginDestination(a))
        );
        assert!(matches!(
            b.add_city(1.5),
            Err(NetworkError::InvalidPopularity(_))
        ));
    }

    #[test]
    fn test_reconnect_track() {
        let (mut net, ids) = line(4);
        let track = net.neighbours(ids[0]).next().unwrap().1.id;
        net.reconnect_track(track, ids[0], ids[3]).unwrap();
        assert!(net.are_connected(ids[0], ids[3]));
        assert!(!net.are_connected(ids[0], ids[1]));
        assert_eq!(net.track(track).unwrap().connects, (ids[0], ids[3]));
        assert_eq!(net.degree(ids[1]), 1);
    }

    #[test]
    fn test_reconnect_rejects_duplicate() {
        let (mut net, ids) = line(3);
        let track = net.neighbours(ids[0]).next().unwrap().1.id;
        assert_eq!(
            net.reconnect_track(track, ids[1], ids[2]),
            Err(NetworkError::DuplicateConnection(ids[1], ids[2]))
        );
        assert_eq!(
            net.reconnect_track(track, ids[2], ids[0]),
            Err(NetworkError::NotAnEndpoint {
                track,
                city: ids[2]
            })
        );
    }
}
