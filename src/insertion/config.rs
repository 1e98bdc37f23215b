//! Insertion heuristic configuration.

/// Train counts for the insertion schedule builder.
///
/// # Examples
///
/// ```
/// use u_timetable::insertion::InsertionConfig;
///
/// let config = InsertionConfig::default();
/// assert_eq!(config.sprinters, 15);
/// assert_eq!(config.intercities, 5);
/// assert_eq!(config.train_count(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertionConfig {
    /// Local trains over the tour of all cities.
    pub sprinters: usize,

    /// Express trains over the tour of popular cities only.
    pub intercities: usize,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            sprinters: 15,
            intercities: 5,
        }
    }
}

impl InsertionConfig {
    pub fn with_sprinters(mut self, n: usize) -> Self {
        self.sprinters = n;
        self
    }

    pub fn with_intercities(mut self, n: usize) -> Self {
        self.intercities = n;
        self
    }

    pub fn train_count(&self) -> usize {
        self.sprinters + self.intercities
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.train_count() == 0 {
            return Err("at least one sprinter or intercity train is required".into());
        }
        Ok(())
    }
}
