//! Candidates and initial population strategies.

use crate::paths::PathTable;
use crate::timetable::TrainRoute;
use rand::Rng;

/// One candidate timetable: a route per train, plus its fitness once
/// scored.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub routes: Vec<TrainRoute>,
    fitness: Option<f64>,
}

impl Candidate {
    /// Unscored candidate.
    pub fn new(routes: Vec<TrainRoute>) -> Self {
        Self {
            routes,
            fitness: None,
        }
    }

    /// Fitness, or `None` if not yet scored.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Fitness for ordering; unscored candidates sort last.
    pub fn fitness_or_worst(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn is_scored(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn train_count(&self) -> usize {
        self.routes.len()
    }
}

/// How the first generation is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Initialization {
    /// `trains` routes per candidate, each a single random composite leg
    /// drawn from the whole path table.
    Random { trains: usize },

    /// Every slot starts as a copy of the given baseline (for example the
    /// insertion heuristic's schedule).
    Seeded(Vec<TrainRoute>),
}

impl Initialization {
    /// Number of trains each candidate will carry.
    pub fn train_count(&self) -> usize {
        match self {
            Initialization::Random { trains } => *trains,
            Initialization::Seeded(routes) => routes.len(),
        }
    }

    /// Builds `size` candidates.
    pub fn population<R: Rng>(&self, table: &PathTable, size: usize, rng: &mut R) -> Vec<Candidate> {
        match self {
            Initialization::Random { trains } => (0..size)
                .map(|_| Candidate::new(random_routes(table, *trains, rng)))
                .collect(),
            Initialization::Seeded(routes) => {
                (0..size).map(|_| Candidate::new(routes.clone())).collect()
            }
        }
    }
}

fn random_routes<R: Rng>(table: &PathTable, trains: usize, rng: &mut R) -> Vec<TrainRoute> {
    let paths = table.paths();
    if paths.is_empty() {
        return Vec::new();
    }
    (0..trains)
        .map(|_| {
            let leg = paths[rng.random_range(0..paths.len())].clone();
            TrainRoute::local(vec![leg])
        })
        .collect()
}
