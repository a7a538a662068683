use crate::config::Hyperparameters;

/// Why a run stopped iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The error fell below the acceptable error, regardless of how the parameters moved.
    AcceptableError,
    /// The error fell below the theta convergence floor and no parameter moved more than
    /// epsilon.
    Settled,
}

/// Tests whether an iteration converged.
///
/// # Arguments
/// * `theta` - The parameters the iteration started from.
/// * `candidate` - The parameters the iteration produced.
/// * `current_error` - The error measured at `theta`.
/// * `hyper` - The thresholds.
///
/// # Returns
/// The reason the run converged, if it did.
pub fn check(
    theta: &[f64],
    candidate: &[f64],
    current_error: f64,
    hyper: &Hyperparameters,
) -> Option<Convergence> {
    if current_error < hyper.acceptable_error {
        return Some(Convergence::AcceptableError);
    }

    let settled = current_error < hyper.theta_convergence
        && theta
            .iter()
            .zip(candidate)
            .all(|(old, new)| (old - new).abs() < hyper.epsilon);

    settled.then_some(Convergence::Settled)
}
