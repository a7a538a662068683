use log::trace;

use crate::config::Hyperparameters;

/// A learning rate that speeds up while the error keeps dropping and slows down otherwise.
///
/// Each adjustment is multiplicative, so the rate is kept within a floor and a ceiling.
#[derive(Debug, Clone)]
pub struct AdaptiveLearningRate {
    rate: f64,
    factor: f64,
    min: f64,
    max: f64,
    previous_error: f64,
}

impl AdaptiveLearningRate {
    /// Creates a new `AdaptiveLearningRate`.
    ///
    /// # Arguments
    /// * `rate` - The initial learning rate.
    /// * `factor` - The fraction the rate changes by on each update.
    /// * `min`, `max` - The bounds the rate is clamped to.
    pub fn new(rate: f64, factor: f64, min: f64, max: f64) -> Self {
        Self {
            rate,
            factor,
            min,
            max,
            previous_error: f64::MAX,
        }
    }

    pub fn from_hyperparameters(hyper: &Hyperparameters) -> Self {
        Self::new(
            hyper.learning_rate,
            hyper.adaptive_rate,
            hyper.min_learning_rate,
            hyper.max_learning_rate,
        )
    }

    /// Adjusts the rate to the error of the current iteration.
    ///
    /// # Returns
    /// The rate to use for this iteration.
    pub fn update(&mut self, current_error: f64) -> f64 {
        let scale = if current_error < self.previous_error {
            1. + self.factor
        } else {
            1. - self.factor
        };

        self.rate = (self.rate * scale).clamp(self.min, self.max);
        self.previous_error = current_error;

        trace!(learning_rate = self.rate, error = current_error; "adapted learning rate");
        self.rate
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}
