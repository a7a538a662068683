use crate::{Result, config::Settings, dataset::Sample, preprocessing::MinMaxRange};

/// The function being minimized: a model (the hypothesis), the loss it incurs over a dataset
/// and the gradient of that loss for a single sample.
///
/// Implementations must not keep per call state, the optimizer evaluates them many times per
/// iteration.
pub trait Objective {
    /// Evaluates the model.
    ///
    /// # Arguments
    /// * `theta` - The model's parameters.
    /// * `features` - The input of the model, as long as `theta`.
    ///
    /// # Returns
    /// The model's output, or an error if `features` and `theta` differ in length.
    fn hypothesis(&self, theta: &[f64], features: &[f64]) -> Result<Vec<f64>>;

    /// Computes the aggregate loss of `theta` over `samples`.
    fn error(&self, theta: &[f64], samples: &[Sample]) -> Result<f64>;

    /// Computes the partial derivative of the loss of a single sample with respect to each
    /// parameter.
    ///
    /// # Arguments
    /// * `sample` - The sample the loss is measured on.
    /// * `theta` - The parameters the derivative is evaluated at.
    /// * `grad` - A buffer as long as `theta` to write the derivatives to.
    fn gradient(&self, sample: &Sample, theta: &[f64], grad: &mut [f64]) -> Result<()>;

    /// Injects objective specific settings, if there are any.
    fn configure(&mut self, settings: Option<&dyn Settings>);

    /// Records the range the dataset was normalized with.
    fn set_range(&mut self, range: MinMaxRange);
}
