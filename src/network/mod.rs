//! Physical network model.
//!
//! Cities joined by undirected, costed tracks, plus the travellers whose
//! journeys define the fitness of a timetable.
//!
//! # Key Types
//!
//! - [`NetworkBuilder`] / [`Network`]: topology with dense city ids
//! - [`NetworkConfig`] + [`generate_network`]: random topology generation
//! - [`IdSequence`]: explicit, builder-local id issuing

mod builder;
mod config;
mod generator;
mod ids;
mod types;

pub use builder::{Network, NetworkBuilder, NetworkError};
pub use config::NetworkConfig;
pub use generator::{generate_network, generate_network_with_rng, GeneratorError};
pub use ids::{CityId, IdSequence, NodeId, TrackId, TravellerId};
pub use types::{City, Time, Track, Traveller};
