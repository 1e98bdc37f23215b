//! Generational optimizer loop.
//!
//! [`EvoRunner`] orchestrates a fixed number of generations:
//! evaluation → truncation selection → mutation → repeat, then scores the
//! final pool and returns its best candidate.

use super::config::EvoConfig;
use super::mutation::mutate_routes;
use super::selection::select_survivors;
use super::types::{Candidate, Initialization};
use crate::eval::{EvalError, ScheduleFitness};
use crate::parallel::{map_ordered, try_map_ordered};
use crate::paths::PathTable;
use crate::random::{create_rng, rng_from_option};
use crate::timetable::TrainRoute;
use rand::Rng;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Optimizer failures.
#[derive(Debug, thiserror::Error)]
pub enum EvoError {
    #[error("invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// A fitness task failed and aborted the generation.
    #[error("generation step failed: {0}")]
    Evaluation(#[from] EvalError),
}

/// Result of an optimizer run.
#[derive(Debug, Clone)]
pub struct EvoResult {
    /// Best candidate of the final pool.
    pub best: Candidate,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Best fitness after each generation's selection, then of the final
    /// pool.
    pub fitness_history: Vec<f64>,
}

impl EvoResult {
    /// Routes of the best candidate.
    pub fn routes(&self) -> &[TrainRoute] {
        &self.best.routes
    }
}

/// Executes the optimizer loop.
///
/// # Usage
///
/// ```ignore
/// let fitness = AverageTravelTime::new(network.travellers());
/// let config = EvoConfig::default().with_seed(42);
/// let result = EvoRunner::run(&fitness, &table, &Initialization::Seeded(routes), &config)?;
/// println!("best: {}", result.best_fitness);
/// ```
pub struct EvoRunner;

impl EvoRunner {
    /// Runs the optimizer.
    ///
    /// # Errors
    /// - [`EvoError::InvalidConfig`] if the configuration or the
    ///   initialization is unusable
    /// - [`EvoError::WorkerPool`] if a dedicated pool cannot be built
    /// - [`EvoError::Evaluation`] if any fitness evaluation fails
    pub fn run<F: ScheduleFitness>(
        fitness: &F,
        table: &PathTable,
        init: &Initialization,
        config: &EvoConfig,
    ) -> Result<EvoResult, EvoError> {
        config.validate().map_err(EvoError::InvalidConfig)?;
        if init.train_count() == 0 {
            return Err(EvoError::InvalidConfig(
                "initialization must provide at least one train".into(),
            ));
        }
        if table.city_count() == 0 {
            return Err(EvoError::InvalidConfig("path table has no cities".into()));
        }

        match config.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| run_loop(fitness, table, init, config))
            }
            None => run_loop(fitness, table, init, config),
        }
    }
}

fn run_loop<F: ScheduleFitness>(
    fitness: &F,
    table: &PathTable,
    init: &Initialization,
    config: &EvoConfig,
) -> Result<EvoResult, EvoError> {
    let mut rng = rng_from_option(config.seed);

    // 1. Initialize population
    let mut population = init.population(table, config.population_size, &mut rng);
    let mut fitness_history = Vec::with_capacity(config.generations + 1);

    // 2. Generational loop
    for generation in 0..config.generations {
        evaluate_pending(fitness, &mut population, config.parallel)?;

        population = select_survivors(
            population,
            config.elite_count(),
            config.keep_count(),
            &mut rng,
        );
        let best = population
            .first()
            .map_or(f64::INFINITY, Candidate::fitness_or_worst);
        fitness_history.push(best);
        debug!(
            generation,
            best_fitness = best,
            survivors = population.len(),
            "generation selected"
        );

        // One seed per child, drawn before dispatch.
        let tasks: Vec<(usize, u64)> = (0..population.len())
            .map(|i| (i, rng.random::<u64>()))
            .collect();
        let parents = population.as_slice();
        let children = map_ordered(&tasks, config.parallel, |&(i, seed)| {
            let mut child_rng = create_rng(seed);
            Candidate::new(mutate_routes(
                &parents[i].routes,
                table,
                config.mutation_share,
                config.insert_probability,
                &mut child_rng,
            ))
        });
        population.extend(children);
    }

    // 3. Score the final pool
    evaluate_pending(fitness, &mut population, config.parallel)?;
    let best = find_best(&population)
        .cloned()
        .ok_or_else(|| EvoError::InvalidConfig("population is empty".into()))?;
    let best_fitness = best.fitness_or_worst();
    fitness_history.push(best_fitness);

    info!(
        generations = config.generations,
        population = config.population_size,
        best_fitness,
        trains = best.train_count(),
        "optimizer finished"
    );

    Ok(EvoResult {
        best,
        best_fitness,
        generations: config.generations,
        fitness_history,
    })
}

/// Scores every candidate that has no fitness yet.
fn evaluate_pending<F: ScheduleFitness>(
    fitness: &F,
    population: &mut [Candidate],
    parallel: bool,
) -> Result<(), EvoError> {
    let pending: Vec<usize> = population
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_scored())
        .map(|(i, _)| i)
        .collect();

    let view: &[Candidate] = &*population;
    let scores = try_map_ordered(&pending, parallel, |&i| {
        fitness.fitness_of_routes(&view[i].routes)
    })?;

    for (i, score) in pending.into_iter().zip(scores) {
        population[i].set_fitness(score);
    }
    Ok(())
}

/// First candidate with the lowest fitness.
fn find_best(population: &[Candidate]) -> Option<&Candidate> {
    population.iter().min_by(|a, b| {
        a.fitness_or_worst()
            .partial_cmp(&b.fitness_or_worst())
            .unwrap_or(Ordering::Equal)
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::AverageTravelTime;
    use crate::network::{CityId, Network, NetworkBuilder, Time};
    use crate::timetable::ScheduleSet;

    // ---- Target length: every route should be as long as `target` ----

    struct TargetLength {
        target: Time,
    }

    impl ScheduleFitness for TargetLength {
        fn fitness(&self, schedules: &ScheduleSet) -> Result<f64, EvalError> {
            Ok(schedules
                .schedules()
                .iter()
                .map(|s| (s.route_length() - self.target).abs() as f64)
                .sum())
        }
    }

    struct Failing;

    impl ScheduleFitness for Failing {
        fn fitness(&self, _: &ScheduleSet) -> Result<f64, EvalError> {
            Err(EvalError::NoTravellers)
        }
    }

    fn ring_network(n: usize) -> Network {
        let mut b = NetworkBuilder::new();
        let c: Vec<CityId> = (0..n).map(|_| b.add_city(0.5).unwrap()).collect();
        for i in 0..n {
            b.add_track(c[i], c[(i + 1) % n], 30 + 5 * i as i64).unwrap();
        }
        for i in 0..n {
            b.add_traveller(c[i], c[(i + n / 2) % n]).unwrap();
            b.add_traveller(c[i], c[(i + 1) % n]).unwrap();
        }
        b.build()
    }

    #[test]
    fn test_target_length_convergence() {
        let network = ring_network(8);
        let table = PathTable::compute(&network).unwrap();
        let config = EvoConfig::default()
            .with_population_size(20)
            .with_generations(60)
            .with_seed(42)
            .with_parallel(false);

        let result = EvoRunner::run(
            &TargetLength { target: 150 },
            &table,
            &Initialization::Random { trains: 2 },
            &config,
        )
        .unwrap();

        let first = result.fitness_history[0];
        assert!(
            result.best_fitness <= first,
            "expected improvement, got {} from {}",
            result.best_fitness,
            first
        );
        assert!(
            result.best_fitness < 100.0,
            "expected routes near length 150, got {}",
            result.best_fitness
        );
    }

    #[test]
    fn test_history_is_monotone_with_elitism() {
        let network = ring_network(8);
        let table = PathTable::compute(&network).unwrap();
        let fitness = AverageTravelTime::new(network.travellers());
        let config = EvoConfig::default()
            .with_population_size(12)
            .with_generations(8)
            .with_seed(7)
            .with_parallel(false);

        let result =
            EvoRunner::run(&fitness, &table, &Initialization::Random { trains: 3 }, &config)
                .unwrap();

        assert_eq!(result.generations, 8);
        assert_eq!(result.fitness_history.len(), 9);
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "fitness should be monotonically non-increasing with elitism: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(result.best.fitness(), Some(result.best_fitness));
        assert!(result.routes().iter().all(|r| r.is_contiguous()));
    }

    #[test]
    fn test_zero_generations_returns_seed() {
        let network = ring_network(6);
        let table = PathTable::compute(&network).unwrap();
        let fitness = AverageTravelTime::new(network.travellers());
        let seed = vec![TrainRoute::local(vec![
            table.path(CityId(0), CityId(3)).clone(),
            table.path(CityId(3), CityId(5)).clone(),
        ])];
        let config = EvoConfig::default()
            .with_population_size(4)
            .with_generations(0)
            .with_seed(1);

        let result =
            EvoRunner::run(&fitness, &table, &Initialization::Seeded(seed.clone()), &config)
                .unwrap();

        assert_eq!(result.routes(), seed.as_slice());
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
        let direct = fitness.fitness_of_routes(&seed).unwrap();
        assert_eq!(result.best_fitness, direct);
    }

    #[test]
    fn test_seeded_run_never_worse_than_seed() {
        let network = ring_network(8);
        let table = PathTable::compute(&network).unwrap();
        let fitness = AverageTravelTime::new(network.travellers());
        let seed = vec![TrainRoute::local(vec![table.path(CityId(0), CityId(4)).clone()])];
        let baseline = fitness.fitness_of_routes(&seed).unwrap();
        let config = EvoConfig::fast().with_seed(3).with_parallel(false);

        let result =
            EvoRunner::run(&fitness, &table, &Initialization::Seeded(seed), &config).unwrap();
        assert!(result.best_fitness <= baseline);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let network = ring_network(8);
        let table = PathTable::compute(&network).unwrap();
        let fitness = AverageTravelTime::new(network.travellers());
        let init = Initialization::Random { trains: 2 };
        let base = EvoConfig::default()
            .with_population_size(10)
            .with_generations(5)
            .with_seed(99);

        let seq = EvoRunner::run(&fitness, &table, &init, &base.clone().with_parallel(false))
            .unwrap();
        let par = EvoRunner::run(&fitness, &table, &init, &base.clone().with_parallel(true))
            .unwrap();
        let pooled = EvoRunner::run(&fitness, &table, &init, &base.with_worker_threads(2))
            .unwrap();

        assert_eq!(seq.fitness_history, par.fitness_history);
        assert_eq!(seq.fitness_history, pooled.fitness_history);
        assert_eq!(seq.best.routes, par.best.routes);
    }

    #[test]
    fn test_failed_evaluation_aborts_run() {
        let network = ring_network(4);
        let table = PathTable::compute(&network).unwrap();
        let config = EvoConfig::fast().with_seed(1);
        let err = EvoRunner::run(&Failing, &table, &Initialization::Random { trains: 1 }, &config)
            .unwrap_err();
        assert!(matches!(err, EvoError::Evaluation(EvalError::NoTravellers)));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let network = ring_network(4);
        let table = PathTable::compute(&network).unwrap();
        let fitness = TargetLength { target: 10 };

        let bad = EvoConfig::default().with_population_size(1);
        let err = EvoRunner::run(&fitness, &table, &Initialization::Random { trains: 1 }, &bad)
            .unwrap_err();
        assert!(matches!(err, EvoError::InvalidConfig(_)));

        let err = EvoRunner::run(
            &fitness,
            &table,
            &Initialization::Random { trains: 0 },
            &EvoConfig::fast(),
        )
        .unwrap_err();
        assert!(matches!(err, EvoError::InvalidConfig(_)));
    }
}
