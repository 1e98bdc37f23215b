//! Plain data types of the physical network.

use super::ids::{CityId, TrackId, TravellerId};

/// Integer time and cost unit shared by tracks, schedules and the evaluator.
///
/// Signed because periodic arithmetic routinely forms `cost - anchor`
/// differences that go negative.
pub type Time = i64;

/// A city (station) in the network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    /// Identity, dense from zero within one network.
    pub id: CityId,
    /// Popularity in `[0, 1]`.
    pub popularity: f64,
}

impl City {
    /// Popularity raised to `skewness`; larger skew widens the gap
    /// between popular and unpopular cities.
    pub fn skewed_popularity(&self, skewness: f64) -> f64 {
        self.popularity.powf(skewness)
    }

    /// Whether the city is served by intercity (express) trains.
    pub fn is_popular(&self) -> bool {
        self.skewed_popularity(3.0) >= 0.7
    }
}

/// A physical track between two cities.
///
/// Composite paths store clones of tracks, i.e. snapshots taken when the
/// path table was computed. Later rewiring of the network does not reach
/// into existing paths.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub id: TrackId,
    /// Travel cost; never negative.
    pub cost: Time,
    /// Unordered endpoints.
    pub connects: (CityId, CityId),
}

impl Track {
    /// Returns the endpoint opposite `city`, or `None` if the track does
    /// not touch `city`.
    pub fn other_end(&self, city: CityId) -> Option<CityId> {
        let (a, b) = self.connects;
        if a == city {
            Some(b)
        } else if b == city {
            Some(a)
        } else {
            None
        }
    }

    /// Whether the track touches `city`.
    pub fn touches(&self, city: CityId) -> bool {
        self.connects.0 == city || self.connects.1 == city
    }
}

/// A passenger wanting to get from `origin` to `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Traveller {
    pub id: TravellerId,
    pub origin: CityId,
    pub destination: CityId,
}
