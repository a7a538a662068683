pub mod config;
pub mod dataset;
pub mod error;
pub mod objective;
pub mod optimization;
pub mod preprocessing;
pub mod report;

pub use error::{DescentErr, Result};
