//! Composite paths and the all-pairs shortest-path table.
//!
//! [`PathTable::compute`] runs Floyd–Warshall over the physical track
//! graph. The resulting table is the vocabulary every schedule builder
//! and mutation operator uses: a train route is a sequence of
//! [`CompositePath`] legs drawn from it.
//!
//! # References
//!
//! - Floyd (1962), "Algorithm 97: Shortest Path", *CACM* 5(6)
//! - Warshall (1962), "A Theorem on Boolean Matrices", *JACM* 9(1)

mod all_pairs;
mod composite;

pub use all_pairs::{PathError, PathTable};
pub use composite::CompositePath;
