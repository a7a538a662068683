use log::{debug, info, warn};

use super::Objective;
use crate::{
    DescentErr, Result, config::Settings, dataset::Sample, preprocessing::MinMaxRange,
};

/// Optional domain constant read from the settings.
pub const DOMAIN_CONSTANT: &str = "mesh.a";

/// Least squares linear regression: the hypothesis is `theta · x` and the loss half the sum of
/// squared residuals.
#[derive(Debug, Default, Clone)]
pub struct LinearObjective {
    domain_constant: Option<f64>,
    range: Option<MinMaxRange>,
}

impl LinearObjective {
    /// Returns a new `LinearObjective`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain_constant(&self) -> Option<f64> {
        self.domain_constant
    }

    /// The range the samples were normalized with, used to map predictions back.
    pub fn range(&self) -> Option<MinMaxRange> {
        self.range
    }

    fn residual(&self, theta: &[f64], sample: &Sample) -> Result<f64> {
        let target = sample.target().ok_or(DescentErr::DimensionMismatch {
            a: "targets",
            b: "outputs",
            got: 0,
            expected: 1,
        })?;

        Ok(self.hypothesis(theta, sample.features())?[0] - target)
    }
}

impl Objective for LinearObjective {
    fn hypothesis(&self, theta: &[f64], features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != theta.len() {
            return Err(DescentErr::DimensionMismatch {
                a: "features",
                b: "theta",
                got: features.len(),
                expected: theta.len(),
            });
        }

        let sum: f64 = theta.iter().zip(features).map(|(t, x)| t * x).sum();
        Ok(vec![sum])
    }

    fn error(&self, theta: &[f64], samples: &[Sample]) -> Result<f64> {
        let sum = samples.iter().try_fold(0., |acc, sample| {
            let diff = self.residual(theta, sample)?;
            Ok::<_, DescentErr>(acc + diff * diff)
        })?;

        Ok(sum / 2.)
    }

    fn gradient(&self, sample: &Sample, theta: &[f64], grad: &mut [f64]) -> Result<()> {
        if grad.len() != theta.len() {
            return Err(DescentErr::DimensionMismatch {
                a: "gradient",
                b: "theta",
                got: grad.len(),
                expected: theta.len(),
            });
        }

        let diff = self.residual(theta, sample)?;
        grad.iter_mut()
            .zip(sample.features())
            .for_each(|(g, x)| *g = diff * x);

        Ok(())
    }

    fn configure(&mut self, settings: Option<&dyn Settings>) {
        let Some(settings) = settings else {
            warn!("no settings supplied to the linear objective");
            return;
        };

        match settings.get_f64(DOMAIN_CONSTANT) {
            Ok(a) => {
                info!("mesh A is: {a}");
                self.domain_constant = Some(a);
            }
            Err(e) => debug!("no domain constant: {e}"),
        }
    }

    fn set_range(&mut self, range: MinMaxRange) {
        self.range = Some(range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigParams;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![1., 1.], vec![3.]),
            Sample::new(vec![1., 2.], vec![5.]),
        ]
    }

    #[test]
    fn hypothesis_is_dot_product() {
        let obj = LinearObjective::new();
        assert_eq!(obj.hypothesis(&[0.5, 2.], &[1., 3.]).unwrap(), [6.5]);
    }

    #[test]
    fn hypothesis_rejects_short_features() {
        let obj = LinearObjective::new();
        let err = obj.hypothesis(&[1., 1., 1.], &[1., 1.]).unwrap_err();

        assert!(matches!(
            err,
            DescentErr::DimensionMismatch {
                got: 2,
                expected: 3,
                ..
            }
        ));
    }

    #[test]
    fn error_is_half_sum_of_squares() {
        let obj = LinearObjective::new();

        // residuals are -1 and -2
        assert_eq!(obj.error(&[1., 1.], &samples()).unwrap(), 2.5);
        assert_eq!(obj.error(&[1., 2.], &samples()).unwrap(), 0.);
    }

    #[test]
    fn gradient_scales_features_by_residual() {
        let obj = LinearObjective::new();
        let mut grad = [0.; 2];
        obj.gradient(&samples()[1], &[1., 1.], &mut grad).unwrap();

        assert_eq!(grad, [-2., -4.]);
    }

    #[test]
    fn gradient_rejects_wrong_buffer() {
        let obj = LinearObjective::new();
        let mut grad = [0.; 3];

        assert!(matches!(
            obj.gradient(&samples()[0], &[1., 1.], &mut grad),
            Err(DescentErr::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn missing_target() {
        let obj = LinearObjective::new();
        let sample = Sample::new(vec![1.], vec![]);

        assert!(matches!(
            obj.error(&[1.], &[sample]),
            Err(DescentErr::DimensionMismatch { a: "targets", .. })
        ));
    }

    #[test]
    fn configure_reads_domain_constant() {
        let mut params = ConfigParams::new();
        params.add("mesh.a:4.5");

        let mut obj = LinearObjective::new();
        obj.configure(Some(&params));
        assert_eq!(obj.domain_constant(), Some(4.5));

        let mut obj = LinearObjective::new();
        obj.configure(None);
        assert_eq!(obj.domain_constant(), None);
    }
}
