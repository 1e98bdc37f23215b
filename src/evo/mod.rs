//! Population-based timetable optimizer.
//!
//! A candidate is a full timetable (one [`TrainRoute`](crate::timetable::TrainRoute)
//! per train). Each generation scores every new candidate in parallel,
//! keeps the best quarter plus a random sample of the rest, and appends
//! one mutated child per survivor. Mutations insert a city into a route or
//! remove a leg, always through shortest composite paths.
//!
//! # Key Types
//!
//! - [`EvoConfig`]: population size, generation count, selection shares, presets
//! - [`Initialization`]: random single-leg routes or a seeded baseline
//! - [`EvoRunner`]: executes the generational loop
//! - [`EvoResult`]: best candidate, its fitness and the fitness history
//!
//! # Submodules
//!
//! - [`mutation`]: route insert/delete operators
//! - [`selection`]: elitist truncation with random survivors
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod mutation;
mod runner;
pub mod selection;
mod types;

pub use config::EvoConfig;
pub use runner::{EvoError, EvoResult, EvoRunner};
pub use types::{Candidate, Initialization};
