use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, DescentErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum DescentErr {
    ConfigKeyMissing {
        key: String,
    },
    ConfigParse {
        key: String,
        value: String,
    },
    InvalidConfig(String),
    EmptyDataset,
    DegenerateRange {
        min: f64,
        max: f64,
    },
    DimensionMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    DidNotConverge {
        iterations: usize,
        best_error: f64,
        theta: Vec<f64>,
    },
    NumericalDivergence {
        iteration: usize,
        what: &'static str,
    },
    DatasetParse {
        token: String,
        position: usize,
    },
    DatasetTruncated {
        expected: usize,
        got: usize,
    },
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for DescentErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescentErr::ConfigKeyMissing { key } => {
                write!(f, "Can not find key {key} in the configuration")
            }
            DescentErr::ConfigParse { key, value } => {
                write!(f, "The value {value:?} of key {key} could not be parsed")
            }
            DescentErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            DescentErr::EmptyDataset => write!(f, "The dataset has no samples"),
            DescentErr::DegenerateRange { min, max } => write!(
                f,
                "The normalisation range is degenerate, min is {min} and max is {max}"
            ),
            DescentErr::DimensionMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            DescentErr::DidNotConverge {
                iterations,
                best_error,
                ..
            } => write!(
                f,
                "Did not converge after {iterations} iterations, best error was {best_error}"
            ),
            DescentErr::NumericalDivergence { iteration, what } => {
                write!(f, "The {what} became non finite at iteration {iteration}")
            }
            DescentErr::DatasetParse { token, position } => {
                write!(f, "Invalid dataset token {token:?} at position {position}")
            }
            DescentErr::DatasetTruncated { expected, got } => write!(
                f,
                "The dataset ended early, expected {expected} values and got {got}"
            ),
            DescentErr::Io(e) => write!(f, "io error: {e}"),
            DescentErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for DescentErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DescentErr::Io(e) => Some(e),
            DescentErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DescentErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DescentErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
