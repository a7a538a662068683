use crate::{DescentErr, Result};

/// Carries a fraction of each parameter's previous update into the next one.
///
/// The velocity is not zero initialized: the first update applied seeds it with its own
/// scaled gradient, so that first step moves the parameters by `(1 + gamma)` times the plain
/// gradient step.
#[derive(Debug)]
pub struct Momentum {
    gamma: f64,
    velocity: Box<[f64]>,
    seeded: bool,
}

impl Momentum {
    /// Creates a new `Momentum`.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `gamma` - The fraction of the previous update carried over.
    ///
    /// # Returns
    /// A new `Momentum` instance.
    pub fn new(len: usize, gamma: f64) -> Self {
        Self {
            gamma,
            velocity: vec![0.; len].into_boxed_slice(),
            seeded: false,
        }
    }

    /// Takes a step against `grad`, blending in the previous step.
    ///
    /// # Arguments
    /// * `learning_rate` - The scale applied to the gradient.
    /// * `grad` - The gradient of the loss at `params`.
    /// * `params` - The parameters to update.
    ///
    /// # Returns
    /// An error if there's a mismatch in the sizes of `grad`, `params` and the velocity.
    pub fn apply(&mut self, learning_rate: f64, grad: &[f64], params: &mut [f64]) -> Result<()> {
        let len = self.velocity.len();
        if grad.len() != len || params.len() != len {
            return Err(DescentErr::DimensionMismatch {
                a: "gradient",
                b: "momentum",
                got: grad.len().max(params.len()),
                expected: len,
            });
        }

        let gamma = self.gamma;
        let seeded = self.seeded;

        params
            .iter_mut()
            .zip(grad)
            .zip(self.velocity.iter_mut())
            .for_each(|((p, g), v)| {
                let step = learning_rate * g;
                if !seeded {
                    *v = step;
                }

                *v = gamma * *v + step;
                *p -= *v;
            });

        self.seeded = true;
        Ok(())
    }

    /// The last update applied to each parameter.
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_seeded_with_itself() {
        let mut momentum = Momentum::new(2, 0.5);
        let mut params = [1., 1.];
        momentum.apply(0.5, &[1., -2.], &mut params).unwrap();

        assert_eq!(momentum.velocity(), [0.75, -1.5]);
        assert_eq!(params, [0.25, 2.5]);
    }

    #[test]
    fn later_steps_use_history() {
        let mut momentum = Momentum::new(1, 0.5);
        let mut params = [0.];
        momentum.apply(1., &[2.], &mut params).unwrap();
        momentum.apply(1., &[1.], &mut params).unwrap();

        // 3 from the seeded step, then 0.5 * 3 + 1
        assert_eq!(momentum.velocity(), [2.5]);
        assert_eq!(params, [-5.5]);
    }

    #[test]
    fn zero_gamma_is_plain_descent() {
        let mut momentum = Momentum::new(1, 0.);
        let mut params = [1.];
        momentum.apply(0.5, &[1.], &mut params).unwrap();
        momentum.apply(0.5, &[1.], &mut params).unwrap();

        assert_eq!(params, [0.]);
    }

    #[test]
    fn size_mismatch() {
        let mut momentum = Momentum::new(2, 0.9);
        let mut params = [0.; 2];

        assert!(matches!(
            momentum.apply(1., &[1.], &mut params),
            Err(DescentErr::DimensionMismatch { .. })
        ));
    }
}
