pub mod convergence;
mod gradient_descent;
mod learning_rate;
mod momentum;

pub use convergence::Convergence;
pub use gradient_descent::{
    DEFAULT_THETA, Fit, GradientDescent, GradientDescentBuilder, State, Status,
};
pub use learning_rate::AdaptiveLearningRate;
pub use momentum::Momentum;
