//! Truncation selection with a random survivor sample.
//!
//! The best candidates (elites) always survive. The remaining survivor
//! slots are filled with a uniform sample, without replacement, from
//! everyone else, which keeps some weaker but different timetables in
//! the gene pool.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Candidate;
use rand::seq::index;
use rand::Rng;
use std::cmp::Ordering;

/// Sorts `population` best first (stable; unscored candidates last).
pub fn sort_by_fitness(population: &mut [Candidate]) {
    population.sort_by(|a, b| {
        a.fitness_or_worst()
            .partial_cmp(&b.fitness_or_worst())
            .unwrap_or(Ordering::Equal)
    });
}

/// Keeps the best `elite` candidates plus a uniform sample of the rest up
/// to `keep` survivors in total.
///
/// The result is ordered best first: elites in rank order, then the
/// sampled candidates in rank order.
pub fn select_survivors<R: Rng>(
    mut population: Vec<Candidate>,
    elite: usize,
    keep: usize,
    rng: &mut R,
) -> Vec<Candidate> {
    sort_by_fitness(&mut population);
    let elite = elite.min(population.len());
    let keep = keep.clamp(elite, population.len());

    let rest = population.split_off(elite);
    let mut picks = index::sample(rng, rest.len(), keep - elite).into_vec();
    picks.sort_unstable();

    let mut rest: Vec<Option<Candidate>> = rest.into_iter().map(Some).collect();
    for i in picks {
        if let Some(candidate) = rest[i].take() {
            population.push(candidate);
        }
    }
    population
}
