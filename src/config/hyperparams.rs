use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::Settings;
use crate::{DescentErr, Result};

pub const ALPHA: &str = "optimisation.grad.alpha";
pub const EPS: &str = "optimisation.grad.eps";
pub const ADAPTIVE_LEARNING_RATE: &str = "optimisation.grad.adaptive_learning_rate";
pub const MOMENTUM_GAMMA: &str = "optimisation.grad.momentum_gamma";
pub const ACCEPTABLE_ERROR: &str = "optimisation.grad.acceptable_error";
pub const THETA_CONVERGENCE: &str = "optimisation.grad.theta_convergence";
pub const LOG_ERR_MODULO: &str = "optimisation.log_err_modulo";
pub const PRINT_ERR_MODULO: &str = "optimisation.print_err_modulo";
pub const MAX_ITERATIONS: &str = "optimisation.max_iterations";
pub const MIN_ALPHA: &str = "optimisation.grad.min_alpha";
pub const MAX_ALPHA: &str = "optimisation.grad.max_alpha";

/// What to do when a required hyperparameter is not configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvePolicy {
    /// Missing keys are an error.
    #[default]
    Strict,
    /// Missing keys take their default value, reported by a single warning.
    UseDefaults,
}

/// The immutable set of settings driving one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Initial learning rate.
    pub learning_rate: f64,
    /// Maximum per parameter movement for the iterations to be considered converged.
    pub epsilon: f64,
    /// Fraction by which the learning rate grows or shrinks each iteration.
    pub adaptive_rate: f64,
    /// Fraction of the previous update carried into the current one.
    pub momentum: f64,
    /// Error below which the run stops regardless of parameter movement.
    pub acceptable_error: f64,
    /// Error below which the run may stop once the parameters settle.
    pub theta_convergence: f64,
    pub log_period: usize,
    pub print_period: usize,
    pub max_iterations: usize,
    pub min_learning_rate: f64,
    pub max_learning_rate: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epsilon: 0.00001,
            adaptive_rate: 0.05,
            momentum: 0.9,
            acceptable_error: 0.00001,
            theta_convergence: 0.01,
            log_period: 1,
            print_period: 1,
            max_iterations: 1_000_000,
            min_learning_rate: 1e-12,
            max_learning_rate: 1e3,
        }
    }
}

impl Hyperparameters {
    /// Resolves the hyperparameters once, before any iteration runs.
    ///
    /// # Arguments
    /// * `settings` - Where to read the values from, if anywhere.
    /// * `policy` - How to treat keys that are not configured.
    ///
    /// # Returns
    /// The resolved bundle, or an error if a required key is missing under
    /// `ResolvePolicy::Strict`, a value does not parse, or the values are out of range.
    pub fn resolve(settings: Option<&dyn Settings>, policy: ResolvePolicy) -> Result<Self> {
        let Some(settings) = settings else {
            warn!("no parameters passed, using base gradient descent settings");
            let hyper = Self::default();
            hyper.validate()?;
            return Ok(hyper);
        };

        let mut resolver = Resolver {
            settings,
            policy,
            fallbacks: Vec::new(),
        };

        let defaults = Self::default();
        let hyper = Self {
            learning_rate: resolver.f64(ALPHA, defaults.learning_rate)?,
            epsilon: resolver.f64(EPS, defaults.epsilon)?,
            adaptive_rate: resolver.f64(ADAPTIVE_LEARNING_RATE, defaults.adaptive_rate)?,
            momentum: resolver.f64(MOMENTUM_GAMMA, defaults.momentum)?,
            acceptable_error: resolver.f64(ACCEPTABLE_ERROR, defaults.acceptable_error)?,
            theta_convergence: resolver.f64(THETA_CONVERGENCE, defaults.theta_convergence)?,
            log_period: resolver.usize(LOG_ERR_MODULO, defaults.log_period)?,
            print_period: resolver.usize(PRINT_ERR_MODULO, defaults.print_period)?,
            max_iterations: optional(settings, MAX_ITERATIONS, defaults.max_iterations)?,
            min_learning_rate: optional(settings, MIN_ALPHA, defaults.min_learning_rate)?,
            max_learning_rate: optional(settings, MAX_ALPHA, defaults.max_learning_rate)?,
        };

        if !resolver.fallbacks.is_empty() {
            warn!(
                "no value configured for {}, using base values",
                resolver.fallbacks.join(", ")
            );
        }

        hyper.validate()?;
        debug!(
            "resolved hyperparameters: {}",
            serde_json::to_string(&hyper)?
        );

        Ok(hyper)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let rates = [
            ("learning rate", self.learning_rate),
            ("epsilon", self.epsilon),
            ("adaptive rate", self.adaptive_rate),
            ("momentum", self.momentum),
            ("acceptable error", self.acceptable_error),
            ("theta convergence", self.theta_convergence),
            ("minimum learning rate", self.min_learning_rate),
            ("maximum learning rate", self.max_learning_rate),
        ];

        if let Some((name, value)) = rates.iter().find(|(_, v)| !v.is_finite() || *v < 0.) {
            return Err(DescentErr::InvalidConfig(format!(
                "{name} must be a finite non negative number, got {value}"
            )));
        }

        if self.adaptive_rate >= 1. {
            return Err(DescentErr::InvalidConfig(format!(
                "adaptive rate must be lower than 1, got {}",
                self.adaptive_rate
            )));
        }

        if self.min_learning_rate > self.max_learning_rate {
            return Err(DescentErr::InvalidConfig(format!(
                "minimum learning rate ({}) exceeds maximum learning rate ({})",
                self.min_learning_rate, self.max_learning_rate
            )));
        }

        let periods = [
            ("log period", self.log_period),
            ("print period", self.print_period),
            ("maximum iterations", self.max_iterations),
        ];

        if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(DescentErr::InvalidConfig(format!(
                "{name} must be greater than 0"
            )));
        }

        Ok(())
    }
}

struct Resolver<'a> {
    settings: &'a dyn Settings,
    policy: ResolvePolicy,
    fallbacks: Vec<&'static str>,
}

impl Resolver<'_> {
    fn f64(&mut self, key: &'static str, default: f64) -> Result<f64> {
        let value = self.settings.get_f64(key);
        self.or_default(key, value, default)
    }

    fn usize(&mut self, key: &'static str, default: usize) -> Result<usize> {
        let value = self.settings.get_usize(key);
        self.or_default(key, value, default)
    }

    fn or_default<T>(&mut self, key: &'static str, value: Result<T>, default: T) -> Result<T> {
        match (value, self.policy) {
            (Err(DescentErr::ConfigKeyMissing { .. }), ResolvePolicy::UseDefaults) => {
                self.fallbacks.push(key);
                Ok(default)
            }
            (value, _) => value,
        }
    }
}

/// Reads a key that has always been optional, falling back silently.
fn optional<T>(settings: &dyn Settings, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    let Some(raw) = settings.raw(key) else {
        return Ok(default);
    };

    raw.trim().parse().map_err(|_| DescentErr::ConfigParse {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
