//! End-to-end experiment: heuristic schedule versus optimized schedule.
//!
//! One attempt generates a topology, computes the path table, builds the
//! insertion timetable, scores it, runs the optimizer and scores the
//! result. Any failure (typically a disconnected random topology) is
//! logged and the attempt restarts from a fresh topology; nothing is
//! resumed.

use crate::eval::{AverageTravelTime, EvalError, ScheduleFitness};
use crate::evo::{EvoConfig, EvoError, EvoResult, EvoRunner, Initialization};
use crate::insertion::{build_insertion_schedule, InsertionConfig, InsertionError};
use crate::network::{generate_network, GeneratorError, Network, NetworkConfig};
use crate::paths::{PathError, PathTable};
use crate::timetable::TrainRoute;
use tracing::{info, warn};

/// Full experiment configuration.
///
/// # Examples
///
/// ```
/// use u_timetable::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::default();
/// assert_eq!(config.network.city_count, 100);
/// assert_eq!(config.insertion.train_count(), 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    pub network: NetworkConfig,
    pub insertion: InsertionConfig,
    pub evo: EvoConfig,

    /// Seed the optimizer with the insertion timetable. When `false` it
    /// starts from random single-leg routes, one per insertion train.
    pub seed_with_insertion: bool,

    /// Attempts before giving up. Each attempt uses a fresh topology.
    pub max_attempts: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            insertion: InsertionConfig::default(),
            evo: EvoConfig::default(),
            seed_with_insertion: true,
            max_attempts: 10,
        }
    }
}

impl ExperimentConfig {
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn with_insertion(mut self, insertion: InsertionConfig) -> Self {
        self.insertion = insertion;
        self
    }

    pub fn with_evo(mut self, evo: EvoConfig) -> Self {
        self.evo = evo;
        self
    }

    pub fn with_seed_with_insertion(mut self, seeded: bool) -> Self {
        self.seed_with_insertion = seeded;
        self
    }

    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Small and quick: 12 cities, 4 local trains, short optimizer run.
    pub fn small() -> Self {
        Self {
            network: NetworkConfig::small(),
            insertion: InsertionConfig::default()
                .with_sprinters(4)
                .with_intercities(0),
            evo: EvoConfig::fast(),
            ..Self::default()
        }
    }

    /// Validates every nested configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.network.validate()?;
        self.insertion.validate()?;
        self.evo.validate()?;
        if self.network.traveller_count == 0 {
            return Err("traveller_count must be at least 1".into());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".into());
        }
        Ok(())
    }
}

/// Why a single attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("topology generation failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error("topology unusable: {0}")]
    Path(#[from] PathError),

    #[error("insertion schedule failed: {0}")]
    Insertion(#[from] InsertionError),

    #[error("scoring failed: {0}")]
    Evaluation(#[from] EvalError),

    #[error("optimizer failed: {0}")]
    Optimizer(#[from] EvoError),
}

/// Experiment failures.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error("invalid experiment configuration: {0}")]
    InvalidConfig(String),

    #[error("gave up after {attempts} attempts, last failure: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: AttemptError,
    },
}

/// Headline numbers of one experiment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentSummary {
    pub insertion_fitness: f64,
    pub evolutionary_fitness: f64,
    /// 1-based attempt that succeeded.
    pub attempts: usize,
}

impl ExperimentSummary {
    /// Fitness gained by the optimizer (positive is better).
    pub fn improvement(&self) -> f64 {
        self.insertion_fitness - self.evolutionary_fitness
    }
}

/// Everything one successful experiment produced.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    pub summary: ExperimentSummary,
    pub network: Network,
    pub insertion_routes: Vec<TrainRoute>,
    pub optimized: EvoResult,
}

/// Runs one experiment, restarting on failure.
///
/// When the network config carries a seed, attempt `i` uses `seed + i` so
/// that every restart sees a different topology.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentOutcome, ExperimentError> {
    config.validate().map_err(ExperimentError::InvalidConfig)?;

    let mut last = None;
    for attempt in 0..config.max_attempts {
        match run_attempt(config, attempt) {
            Ok((network, insertion_routes, insertion_fitness, optimized)) => {
                let summary = ExperimentSummary {
                    insertion_fitness,
                    evolutionary_fitness: optimized.best_fitness,
                    attempts: attempt + 1,
                };
                info!(
                    attempts = summary.attempts,
                    insertion_fitness,
                    evolutionary_fitness = summary.evolutionary_fitness,
                    "experiment finished"
                );
                return Ok(ExperimentOutcome {
                    summary,
                    network,
                    insertion_routes,
                    optimized,
                });
            }
            Err(err) => {
                warn!(attempt, error = %err, "attempt failed, restarting with a fresh topology");
                last = Some(err);
            }
        }
    }

    match last {
        Some(last) => Err(ExperimentError::Exhausted {
            attempts: config.max_attempts,
            last,
        }),
        None => Err(ExperimentError::InvalidConfig(
            "max_attempts must be at least 1".into(),
        )),
    }
}

/// Runs `runs` independent experiments and collects their summaries.
pub fn run_experiments(
    config: &ExperimentConfig,
    runs: usize,
) -> Result<Vec<ExperimentSummary>, ExperimentError> {
    (0..runs)
        .map(|run| {
            let mut per_run = config.clone();
            per_run.network.seed = config
                .network
                .seed
                .map(|s| s.wrapping_add((run * config.max_attempts) as u64));
            per_run.evo.seed = config.evo.seed.map(|s| s.wrapping_add(run as u64));
            run_experiment(&per_run).map(|outcome| outcome.summary)
        })
        .collect()
}

type AttemptOutput = (Network, Vec<TrainRoute>, f64, EvoResult);

fn run_attempt(config: &ExperimentConfig, attempt: usize) -> Result<AttemptOutput, AttemptError> {
    let network_config = NetworkConfig {
        seed: config.network.seed.map(|s| s.wrapping_add(attempt as u64)),
        ..config.network.clone()
    };
    let network = generate_network(&network_config)?;
    let table = PathTable::compute(&network)?;

    let insertion_routes = build_insertion_schedule(&network, &table, &config.insertion)?;
    let fitness = AverageTravelTime::new(network.travellers());
    let insertion_fitness = fitness.fitness_of_routes(&insertion_routes)?;

    let init = if config.seed_with_insertion {
        Initialization::Seeded(insertion_routes.clone())
    } else {
        Initialization::Random {
            trains: config.insertion.train_count(),
        }
    };
    let optimized = EvoRunner::run(&fitness, &table, &init, &config.evo)?;

    Ok((network, insertion_routes, insertion_fitness, optimized))
}

/// Paired comparison of heuristic and optimized fitness over many runs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    /// Mean insertion fitness minus mean optimized fitness.
    pub mean_difference: f64,
    /// Half-width of the 95% confidence interval of the difference.
    pub margin_95: f64,
    /// Two-sample z statistic of the difference.
    pub z: f64,
}

/// Compares the two fitness series with a two-sample z statistic.
///
/// Returns `None` with fewer than two summaries.
pub fn compare(summaries: &[ExperimentSummary]) -> Option<Comparison> {
    if summaries.len() < 2 {
        return None;
    }
    let insertion: Vec<f64> = summaries.iter().map(|s| s.insertion_fitness).collect();
    let evolutionary: Vec<f64> = summaries.iter().map(|s| s.evolutionary_fitness).collect();

    let se = (standard_error(&insertion).powi(2) + standard_error(&evolutionary).powi(2)).sqrt();
    let mean_difference = mean(&insertion) - mean(&evolutionary);
    let z = if se > 0.0 {
        mean_difference.abs() / se
    } else {
        f64::INFINITY
    };
    Some(Comparison {
        mean_difference,
        margin_95: 1.96 * se,
        z,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard error of the mean with Bessel's correction.
fn standard_error(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt() / n.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> ExperimentConfig {
        ExperimentConfig::small()
            .with_network(NetworkConfig::small().with_seed(5))
            .with_evo(
                EvoConfig::fast()
                    .with_population_size(8)
                    .with_generations(3)
                    .with_seed(5)
                    .with_parallel(false),
            )
            .with_max_attempts(30)
    }

    #[test]
    fn test_small_experiment_succeeds() {
        let outcome = run_experiment(&quick_config()).unwrap();
        let summary = outcome.summary;
        assert!(summary.attempts >= 1);
        assert!(summary.insertion_fitness > 0.0);
        // Seeded with the insertion schedule and elitist.
        assert!(
            summary.evolutionary_fitness <= summary.insertion_fitness,
            "optimized {} worse than seed {}",
            summary.evolutionary_fitness,
            summary.insertion_fitness
        );
        assert!(summary.improvement() >= 0.0);
        assert_eq!(outcome.insertion_routes.len(), 4);
        assert_eq!(outcome.optimized.routes().len(), 4);
    }

    #[test]
    fn test_experiment_is_reproducible() {
        let a = run_experiment(&quick_config()).unwrap().summary;
        let b = run_experiment(&quick_config()).unwrap().summary;
        assert_eq!(a, b);
    }

    #[test]
    fn test_exhausted_attempts_report_last_error() {
        // 12 cities give an 11-leg tour; 50 trains cannot each get a leg.
        let config = quick_config()
            .with_insertion(InsertionConfig::default().with_sprinters(50).with_intercities(0))
            .with_max_attempts(2);
        match run_experiment(&config) {
            Err(ExperimentError::Exhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_not_retried() {
        let config = quick_config().with_max_attempts(0);
        assert!(matches!(
            run_experiment(&config),
            Err(ExperimentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_compare_statistics() {
        let summaries = vec![
            ExperimentSummary {
                insertion_fitness: 10.0,
                evolutionary_fitness: 8.0,
                attempts: 1,
            },
            ExperimentSummary {
                insertion_fitness: 12.0,
                evolutionary_fitness: 8.0,
                attempts: 1,
            },
        ];
        let cmp = compare(&summaries).unwrap();
        assert!((cmp.mean_difference - 3.0).abs() < 1e-12);
        // SE(insertion) = 1, SE(evolutionary) = 0
        assert!((cmp.margin_95 - 1.96).abs() < 1e-12);
        assert!((cmp.z - 3.0).abs() < 1e-12);
        assert!(compare(&summaries[..1]).is_none());
    }
}
