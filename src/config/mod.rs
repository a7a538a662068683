pub mod hyperparams;
mod params;

pub use hyperparams::{Hyperparameters, ResolvePolicy};
pub use params::{ConfigParams, Settings};
