//! Random topology generation.
//!
//! Builds a ring-like base network, rewires tracks towards popular cities
//! and samples travellers whose endpoints are skewed towards popular
//! cities. The result is not guaranteed to be connected; the all-pairs
//! path table reports that case.

use super::builder::{Network, NetworkBuilder, NetworkError};
use super::config::NetworkConfig;
use super::ids::CityId;
use crate::random::rng_from_option;
use rand::Rng;
use tracing::debug;

/// Rejection-sampling budget per requested traveller.
const TRAVELLER_ATTEMPTS_PER_SLOT: usize = 10_000;

/// Failure to produce a network from a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("invalid network config: {0}")]
    InvalidConfig(String),

    #[error("sampled only {found} of {wanted} travellers")]
    TravellerSampling { wanted: usize, found: usize },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Generates a network using the config's seed.
pub fn generate_network(config: &NetworkConfig) -> Result<Network, GeneratorError> {
    let mut rng = rng_from_option(config.seed);
    generate_network_with_rng(config, &mut rng)
}

/// Generates a network drawing randomness from `rng`.
pub fn generate_network_with_rng<R: Rng>(
    config: &NetworkConfig,
    rng: &mut R,
) -> Result<Network, GeneratorError> {
    config.validate().map_err(GeneratorError::InvalidConfig)?;

    let mut builder = NetworkBuilder::new();
    for _ in 0..config.city_count {
        builder.add_city(rng.random_range(0.0..1.0))?;
    }

    link_neighbouring_cities(&mut builder, config, rng)?;
    for _ in 0..config.randomizer_passes {
        rewire_pass(builder.network_mut(), rng)?;
    }
    sample_travellers(&mut builder, config.traveller_count, rng)?;

    let network = builder.build();
    debug!(
        cities = network.cities().len(),
        tracks = network.tracks().len(),
        travellers = network.travellers().len(),
        "generated network"
    );
    Ok(network)
}

/// Links every city to the next `average_tracks / 2` cities around a ring.
fn link_neighbouring_cities<R: Rng>(
    builder: &mut NetworkBuilder,
    config: &NetworkConfig,
    rng: &mut R,
) -> Result<(), NetworkError> {
    let n = config.city_count;
    let half = config.average_tracks / 2;
    for i in 0..n {
        for x in (i + 1)..=(i + half) {
            let (a, b) = (CityId(i), CityId(x % n));
            // Small rings wrap onto themselves.
            if a == b || builder.network().are_connected(a, b) {
                continue;
            }
            let cost = rng.random_range(config.min_track_cost..config.max_track_cost);
            builder.add_track(a, b, cost)?;
        }
    }
    Ok(())
}

/// One rewiring pass: each track may move its second endpoint to a random
/// city, accepted with the new city's popularity^4 and only if the old
/// endpoint keeps another track.
fn rewire_pass<R: Rng>(network: &mut Network, rng: &mut R) -> Result<(), NetworkError> {
    let n = network.cities().len();
    for t in 0..network.tracks().len() {
        let track = &network.tracks()[t];
        let (track_id, (keep, old_end)) = (track.id, track.connects);

        let mut candidate = CityId(rng.random_range(0..n));
        let mut tries = 0;
        let mut found = true;
        while candidate == keep || network.are_connected(keep, candidate) {
            if tries > n {
                found = false;
                break;
            }
            candidate = CityId(rng.random_range(0..n));
            tries += 1;
        }
        if !found {
            continue;
        }

        let chance: f64 = rng.random_range(0.0..1.0);
        let popularity = network.cities()[candidate.0].skewed_popularity(4.0);
        if popularity < chance || network.degree(old_end) == 1 {
            continue;
        }
        network.reconnect_track(track_id, keep, candidate)?;
    }
    Ok(())
}

fn sample_travellers<R: Rng>(
    builder: &mut NetworkBuilder,
    wanted: usize,
    rng: &mut R,
) -> Result<(), GeneratorError> {
    let n = builder.network().cities().len();
    let budget = wanted.saturating_mul(TRAVELLER_ATTEMPTS_PER_SLOT);
    let mut found = 0;

    for _ in 0..budget {
        if found == wanted {
            break;
        }
        let origin = CityId(rng.random_range(0..n));
        let chance: f64 = rng.random_range(0.0..1.0);
        if builder.network().cities()[origin.0].skewed_popularity(1.5) < chance {
            continue;
        }

        let mut destination = CityId(rng.random_range(0..n));
        while destination == origin {
            destination = CityId(rng.random_range(0..n));
        }
        let chance: f64 = rng.random_range(0.0..1.0);
        if builder.network().cities()[destination.0].skewed_popularity(3.5) < chance {
            continue;
        }

        builder.add_traveller(origin, destination)?;
        found += 1;
    }

    if found < wanted {
        return Err(GeneratorError::TravellerSampling { wanted, found });
    }
    Ok(())
}
