//! Random topology configuration.

use super::types::Time;

/// Parameters for [`generate_network`](super::generate_network).
///
/// # Examples
///
/// ```
/// use u_timetable::network::NetworkConfig;
///
/// let config = NetworkConfig::default()
///     .with_city_count(30)
///     .with_traveller_count(100)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Number of cities.
    pub city_count: usize,

    /// Average number of tracks touching each city. Must be even: each
    /// city initially links to the next `average_tracks / 2` cities.
    pub average_tracks: usize,

    /// Number of rewiring passes over all tracks.
    ///
    /// More passes make the topology more random but also strengthen the
    /// pull of popular cities.
    pub randomizer_passes: usize,

    /// Number of travellers to sample.
    pub traveller_count: usize,

    /// Inclusive lower bound of track cost.
    pub min_track_cost: Time,

    /// Exclusive upper bound of track cost.
    pub max_track_cost: Time,

    /// Random seed. `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            city_count: 100,
            average_tracks: 2,
            randomizer_passes: 2,
            traveller_count: 500,
            min_track_cost: 30,
            max_track_cost: 100,
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn with_city_count(mut self, n: usize) -> Self {
        self.city_count = n;
        self
    }

    pub fn with_average_tracks(mut self, n: usize) -> Self {
        self.average_tracks = n;
        self
    }

    pub fn with_randomizer_passes(mut self, n: usize) -> Self {
        self.randomizer_passes = n;
        self
    }

    pub fn with_traveller_count(mut self, n: usize) -> Self {
        self.traveller_count = n;
        self
    }

    /// Sets the track cost range `[min, max)`.
    pub fn with_track_cost_range(mut self, min: Time, max: Time) -> Self {
        self.min_track_cost = min;
        self.max_track_cost = max;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Small network preset for quick experiments and tests.
    ///
    /// - Cities: 12, Travellers: 40
    pub fn small() -> Self {
        Self {
            city_count: 12,
            traveller_count: 40,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.city_count < 2 {
            return Err("city_count must be at least 2".into());
        }
        if self.average_tracks < 2 || self.average_tracks % 2 != 0 {
            return Err("average_tracks must be even and at least 2".into());
        }
        if self.min_track_cost < 0 {
            return Err("min_track_cost must be non-negative".into());
        }
        if self.max_track_cost <= self.min_track_cost {
            return Err("track cost range is empty".into());
        }
        Ok(())
    }
}
