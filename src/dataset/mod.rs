mod reader;
mod sample;

pub use reader::{BIAS, load_samples, read_samples};
pub use sample::Sample;
