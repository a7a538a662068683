use std::fmt;

/// A single training example: the features fed to the hypothesis and the targets it should
/// produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    features: Vec<f64>,
    targets: Vec<f64>,
}

impl Sample {
    /// Creates a new `Sample`.
    ///
    /// # Arguments
    /// * `features` - The feature vector, conventionally starting with a constant bias of `1.0`.
    /// * `targets` - The expected outputs for this example.
    ///
    /// # Returns
    /// A new `Sample` instance.
    pub fn new(features: Vec<f64>, targets: Vec<f64>) -> Self {
        Self { features, targets }
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Returns the first target, the only one single output objectives use.
    pub fn target(&self) -> Option<f64> {
        self.targets.first().copied()
    }

    /// Applies `f` in place to every feature and target value.
    pub(crate) fn map_values<F>(&mut self, mut f: F)
    where
        F: FnMut(f64) -> f64,
    {
        self.features
            .iter_mut()
            .chain(self.targets.iter_mut())
            .for_each(|v| *v = f(*v));
    }

    /// Iterates every feature followed by every target.
    pub(crate) fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.features.iter().chain(&self.targets).copied()
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |values: &[f64]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        write!(f, "({}) -> ({})", join(&self.features), join(&self.targets))
    }
}
