mod error_graphs;

pub use error_graphs::{ErrorGraph, ErrorGraphs, FULL_ERROR_FILE, LOG_ERROR_FILE};
