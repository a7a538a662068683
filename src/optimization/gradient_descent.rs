use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use super::{AdaptiveLearningRate, Convergence, Momentum, convergence};
use crate::{
    DescentErr, Result,
    config::{Hyperparameters, ResolvePolicy, Settings},
    dataset::Sample,
    objective::Objective,
    preprocessing::MinMaxRange,
};

/// Value given to every parameter not covered by the initial theta.
pub const DEFAULT_THETA: f64 = 1.0;

/// The lifecycle of a `GradientDescent` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Initialized,
    Iterating,
    Converged,
    Cancelled,
    Failed,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Converged(Convergence),
    Cancelled,
}

/// The outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    /// The final parameters.
    pub theta: Vec<f64>,
    /// The amount of iterations performed by the run.
    pub iterations: usize,
    /// The error measured at the start of the last iteration.
    pub error: f64,
    pub status: Status,
}

/// Fits the parameters of an objective to a dataset by gradient descent.
///
/// Each iteration walks the samples in order, applying every sample's gradient (scaled by an
/// adaptive learning rate and smoothed with momentum) to a candidate copy of the parameters,
/// which is only committed once the whole pass is done.
pub struct GradientDescent<O: Objective> {
    theta: Vec<f64>,
    samples: Vec<Sample>,
    objective: O,
    hyper: Hyperparameters,
    loss_history: Vec<f64>,
    state: State,
    iterations: usize,
    cancel: Option<CancellationToken>,
}

impl<O: Objective> GradientDescent<O> {
    /// Returns a builder for a `GradientDescent` over `samples`.
    ///
    /// # Arguments
    /// * `objective` - The function to minimize.
    /// * `samples` - The (already normalized) dataset.
    /// * `range` - The range the dataset was normalized with.
    pub fn builder<'a>(
        objective: O,
        samples: Vec<Sample>,
        range: MinMaxRange,
    ) -> GradientDescentBuilder<'a, O> {
        GradientDescentBuilder {
            objective,
            samples,
            range,
            initial_theta: Vec::new(),
            settings: None,
            policy: ResolvePolicy::default(),
            hyper: None,
            cancel: None,
        }
    }

    /// Iterates until the parameters converge.
    ///
    /// # Returns
    /// The fitted parameters, or an error if the objective fails, the error or parameters
    /// become non finite, or `max_iterations` is reached first. In the latter case the error
    /// carries the parameters with the lowest error seen.
    pub fn run(&mut self) -> Result<Fit> {
        self.state = State::Iterating;
        self.iterations = 0;

        let result = self.iterate();
        self.state = match &result {
            Ok(Fit {
                status: Status::Converged(_),
                ..
            }) => State::Converged,
            Ok(Fit {
                status: Status::Cancelled,
                ..
            }) => State::Cancelled,
            Err(e) => {
                warn!("gradient descent failed: {e}");
                State::Failed
            }
        };

        result
    }

    fn iterate(&mut self) -> Result<Fit> {
        let n = self.theta.len();
        let mut learning_rate = AdaptiveLearningRate::from_hyperparameters(&self.hyper);
        let mut momentum = Momentum::new(n, self.hyper.momentum);
        let mut grad = vec![0.; n];
        let mut best = (f64::INFINITY, self.theta.clone());

        info!(
            "starting gradient descent over {} samples and {n} parameters",
            self.samples.len()
        );

        loop {
            if self.is_cancelled() {
                info!("cancelled after {} iterations", self.iterations);
                let error = self.objective.error(&self.theta, &self.samples)?;
                return Ok(self.fit(error, Status::Cancelled));
            }

            let current_error = self.objective.error(&self.theta, &self.samples)?;
            if !current_error.is_finite() {
                return Err(DescentErr::NumericalDivergence {
                    iteration: self.iterations,
                    what: "error",
                });
            }

            if current_error < best.0 {
                best = (current_error, self.theta.clone());
            }

            self.update_error_logs(current_error);
            let alpha = learning_rate.update(current_error);

            let mut candidate = self.theta.clone();
            for sample in &self.samples {
                self.objective.gradient(sample, &candidate, &mut grad)?;
                momentum.apply(alpha, &grad, &mut candidate)?;
            }

            if candidate.iter().any(|t| !t.is_finite()) {
                return Err(DescentErr::NumericalDivergence {
                    iteration: self.iterations,
                    what: "parameters",
                });
            }

            let converged = convergence::check(&self.theta, &candidate, current_error, &self.hyper);
            self.theta = candidate;
            self.iterations += 1;

            if let Some(reason) = converged {
                match reason {
                    Convergence::AcceptableError => {
                        info!("current error below the acceptable threshold level")
                    }
                    Convergence::Settled => info!("parameters stopped changing"),
                }

                info!(
                    "converged after {} iterations with error {current_error}",
                    self.iterations
                );
                return Ok(self.fit(current_error, Status::Converged(reason)));
            }

            if self.iterations >= self.hyper.max_iterations {
                let (best_error, theta) = best;
                return Err(DescentErr::DidNotConverge {
                    iterations: self.iterations,
                    best_error,
                    theta,
                });
            }
        }
    }

    fn update_error_logs(&mut self, current_error: f64) {
        if self.iterations % self.hyper.log_period == 0 {
            self.log_error(current_error);
        }

        if self.iterations % self.hyper.print_period == 0 {
            info!("iteration {}: error is {current_error}", self.iterations);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn fit(&self, error: f64, status: Status) -> Fit {
        Fit {
            theta: self.theta.clone(),
            iterations: self.iterations,
            error,
            status,
        }
    }

    /// Records an error value in the loss history.
    pub fn log_error(&mut self, error: f64) {
        self.loss_history.push(error);
    }

    /// The recorded errors, one every `log_period` iterations.
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// Logs the target of every sample.
    pub fn log_samples(&self) {
        for (i, sample) in self.samples.iter().enumerate() {
            debug!("example: {i} target: {:?}", sample.target());
        }
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

/// Builds a `GradientDescent`, injecting the settings and range into its objective and
/// resolving its hyperparameters once.
pub struct GradientDescentBuilder<'a, O: Objective> {
    objective: O,
    samples: Vec<Sample>,
    range: MinMaxRange,
    initial_theta: Vec<f64>,
    settings: Option<&'a dyn Settings>,
    policy: ResolvePolicy,
    hyper: Option<Hyperparameters>,
    cancel: Option<CancellationToken>,
}

impl<'a, O: Objective> GradientDescentBuilder<'a, O> {
    /// Sets the initial parameters. Shorter vectors are padded with [`DEFAULT_THETA`].
    pub fn initial_theta(mut self, theta: Vec<f64>) -> Self {
        self.initial_theta = theta;
        self
    }

    /// Sets where both the hyperparameters and the objective's settings are read from.
    pub fn settings(mut self, settings: &'a dyn Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Uses `hyper` as is instead of resolving it from the settings.
    pub fn hyperparameters(mut self, hyper: Hyperparameters) -> Self {
        self.hyper = Some(hyper);
        self
    }

    /// Sets a token that stops the run at the start of the next iteration once cancelled.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the `GradientDescent`.
    ///
    /// # Returns
    /// An error if the dataset is empty, the samples disagree on their amount of features,
    /// the initial theta is longer than the features, or the hyperparameters can't be
    /// resolved.
    pub fn build(self) -> Result<GradientDescent<O>> {
        let Self {
            mut objective,
            samples,
            range,
            initial_theta,
            settings,
            policy,
            hyper,
            cancel,
        } = self;

        let nfeatures = samples
            .first()
            .ok_or(DescentErr::EmptyDataset)?
            .features()
            .len();

        if let Some(sample) = samples.iter().find(|s| s.features().len() != nfeatures) {
            return Err(DescentErr::DimensionMismatch {
                a: "sample features",
                b: "first sample features",
                got: sample.features().len(),
                expected: nfeatures,
            });
        }

        if initial_theta.len() > nfeatures {
            return Err(DescentErr::DimensionMismatch {
                a: "initial theta",
                b: "features",
                got: initial_theta.len(),
                expected: nfeatures,
            });
        }

        let mut theta = vec![DEFAULT_THETA; nfeatures];
        theta[..initial_theta.len()].copy_from_slice(&initial_theta);

        objective.configure(settings);
        objective.set_range(range);

        let hyper = match hyper {
            Some(hyper) => {
                hyper.validate()?;
                hyper
            }
            None => Hyperparameters::resolve(settings, policy)?,
        };

        Ok(GradientDescent {
            theta,
            samples,
            objective,
            hyper,
            loss_history: Vec::new(),
            state: State::Initialized,
            iterations: 0,
            cancel,
        })
    }
}
