use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{DescentErr, Result};

pub const LOG_ERROR_FILE: &str = "log_error_plot.json";
pub const FULL_ERROR_FILE: &str = "full_plot.json";

/// A loss series ready to be plotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorGraph {
    pub title: String,
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    /// The length of the series before trimming.
    pub iterations: usize,
    pub values: Vec<f64>,
}

/// Writes the recorded loss history as a log scaled and a linear scaled series.
#[derive(Debug, Clone)]
pub struct ErrorGraphs {
    dir: PathBuf,
    trim: f64,
}

impl ErrorGraphs {
    /// Creates a new `ErrorGraphs`.
    ///
    /// # Arguments
    /// * `dir` - The directory the series are written to.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            trim: 0.,
        }
    }

    /// Drops `fraction` of the series from each end before writing it.
    ///
    /// # Returns
    /// An error if `fraction` is not within `[0, 0.5)`.
    pub fn trim(mut self, fraction: f64) -> Result<Self> {
        if !(0. ..0.5).contains(&fraction) {
            return Err(DescentErr::InvalidConfig(format!(
                "graph trim must be within [0, 0.5), got {fraction}"
            )));
        }

        self.trim = fraction;
        Ok(self)
    }

    /// Builds the series for `history`.
    ///
    /// # Arguments
    /// * `history` - The recorded errors.
    /// * `log_scale` - Whether to take the base 10 logarithm of every error.
    pub fn graph(&self, history: &[f64], log_scale: bool) -> ErrorGraph {
        let size = history.len();
        let cut = (size as f64 * self.trim) as usize;
        let trimmed = &history[cut..size - cut];

        let values = trimmed
            .iter()
            .map(|&e| if log_scale { e.log10() } else { e })
            .collect();

        ErrorGraph {
            title: "Gradient Descent (Error per Iteration)".to_string(),
            name: format!("Error ({size} iterations, {} displayed)", trimmed.len()),
            x_label: "Iteration Number".to_string(),
            y_label: if log_scale { "log(L2 Error)" } else { "L2 Error" }.to_string(),
            iterations: size,
            values,
        }
    }

    /// Writes both series into the output directory, creating it if needed.
    ///
    /// # Returns
    /// The paths written to.
    pub fn write(&self, history: &[f64]) -> Result<Vec<PathBuf>> {
        info!("error vector size: {}", history.len());
        fs::create_dir_all(&self.dir)?;

        [(LOG_ERROR_FILE, true), (FULL_ERROR_FILE, false)]
            .into_iter()
            .map(|(name, log_scale)| -> Result<PathBuf> {
                let path = self.dir.join(name);
                write_json(&path, &self.graph(history, log_scale))?;
                Ok(path)
            })
            .collect()
    }
}

fn write_json(path: &Path, graph: &ErrorGraph) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, graph)?;
    writer.flush()?;
    info!("wrote {}", path.display());
    Ok(())
}
