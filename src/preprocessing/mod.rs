mod normalization;

pub use normalization::{MinMaxRange, compute_range, normalize};
