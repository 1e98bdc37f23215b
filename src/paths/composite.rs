//! Composite paths: ordered track sequences between two cities.

use crate::network::{CityId, Time, Track};

/// The cheapest known concatenation of tracks from `start` to `end`.
///
/// Invariant: `total_distance == tracks.iter().map(|t| t.cost).sum()`.
/// A path with `start == end` and no tracks is the identity element of
/// [`concat`](CompositePath::concat).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositePath {
    tracks: Vec<Track>,
    total_distance: Time,
    start: CityId,
    end: CityId,
}

impl CompositePath {
    /// Zero-length path that stays at `city`.
    pub fn identity(city: CityId) -> Self {
        Self {
            tracks: Vec::new(),
            total_distance: 0,
            start: city,
            end: city,
        }
    }

    /// Single-track path from `from` across `track`.
    ///
    /// Returns `None` if `track` does not touch `from`.
    pub fn single(track: &Track, from: CityId) -> Option<Self> {
        let to = track.other_end(from)?;
        Some(Self {
            tracks: vec![track.clone()],
            total_distance: track.cost,
            start: from,
            end: to,
        })
    }

    /// Joins `self` with `next`, which must start where `self` ends.
    pub fn concat(&self, next: &CompositePath) -> Self {
        debug_assert_eq!(self.end, next.start, "paths must be contiguous");
        let mut tracks = Vec::with_capacity(self.tracks.len() + next.tracks.len());
        tracks.extend_from_slice(&self.tracks);
        tracks.extend_from_slice(&next.tracks);
        Self {
            tracks,
            total_distance: self.total_distance + next.total_distance,
            start: self.start,
            end: next.end,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn total_distance(&self) -> Time {
        self.total_distance
    }

    pub fn start(&self) -> CityId {
        self.start
    }

    pub fn end(&self) -> CityId {
        self.end
    }

    pub fn is_identity(&self) -> bool {
        self.start == self.end && self.tracks.is_empty()
    }
}

impl std::fmt::Display for CompositePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "|start: {}, end: {}, cost: {}|",
            self.start.0, self.end.0, self.total_distance
        )
    }
}
