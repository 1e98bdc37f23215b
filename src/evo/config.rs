//! Optimizer configuration.
//!
//! [`EvoConfig`] holds every parameter of the generational loop.

/// Configuration for the timetable optimizer.
///
/// # Defaults
///
/// ```
/// use u_timetable::evo::EvoConfig;
///
/// let config = EvoConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 300);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::evo::EvoConfig;
///
/// let config = EvoConfig::default()
///     .with_population_size(20)
///     .with_generations(40)
///     .with_insert_probability(0.7)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvoConfig {
    /// Number of candidate schedule sets per generation.
    pub population_size: usize,

    /// Fixed number of generations. Zero evaluates the initial pool only.
    pub generations: usize,

    /// Fraction of the population kept unconditionally, best first
    /// (rounded up).
    pub elite_fraction: f64,

    /// Fraction of the population that survives selection (rounded up).
    ///
    /// Slots above the elite share are filled by a uniform sample of the
    /// remaining candidates.
    pub keep_fraction: f64,

    /// Share of a candidate's train routes mutated per child (rounded up).
    pub mutation_share: f64,

    /// Probability of an insert (rather than delete) mutation on routes
    /// with more than one leg.
    pub insert_probability: f64,

    /// Whether to evaluate and mutate candidates in parallel using rayon.
    pub parallel: bool,

    /// Dedicated worker pool size.
    ///
    /// `None` uses rayon's global pool.
    pub worker_threads: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvoConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 300,
            elite_fraction: 0.25,
            keep_fraction: 0.5,
            mutation_share: 0.5,
            insert_probability: 0.5,
            parallel: true,
            worker_threads: None,
            seed: None,
        }
    }
}

impl EvoConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the elite fraction.
    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the surviving fraction.
    pub fn with_keep_fraction(mut self, fraction: f64) -> Self {
        self.keep_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the share of routes mutated per child.
    pub fn with_mutation_share(mut self, share: f64) -> Self {
        self.mutation_share = share.clamp(0.0, 1.0);
        self
    }

    /// Sets the insert-vs-delete probability.
    pub fn with_insert_probability(mut self, p: f64) -> Self {
        self.insert_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation and mutation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Runs on a dedicated pool of `n` threads.
    pub fn with_worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = Some(n);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for smoke runs and tests: population 16, 20 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 16,
            generations: 20,
            ..Self::default()
        }
    }

    /// The defaults: population 50, 300 generations.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for long runs: population 100, 1000 generations.
    pub fn quality() -> Self {
        Self {
            population_size: 100,
            generations: 1000,
            ..Self::default()
        }
    }

    /// Number of elites kept per generation.
    pub fn elite_count(&self) -> usize {
        ceil_share(self.population_size, self.elite_fraction)
    }

    /// Number of candidates surviving selection, elites included.
    pub fn keep_count(&self) -> usize {
        ceil_share(self.population_size, self.keep_fraction).max(self.elite_count())
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.elite_count() == 0 {
            return Err("elite_fraction must keep at least one candidate".into());
        }
        if self.keep_count() >= self.population_size {
            return Err("keep_fraction too high: survivors fill entire population".into());
        }
        if self.keep_fraction < self.elite_fraction {
            return Err("keep_fraction must be at least elite_fraction".into());
        }
        if self.worker_threads == Some(0) {
            return Err("worker_threads must be positive or None".into());
        }
        Ok(())
    }
}

fn ceil_share(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction).ceil() as usize
}
