mod linear;
mod objective;

pub use linear::{DOMAIN_CONSTANT, LinearObjective};
pub use objective::Objective;
