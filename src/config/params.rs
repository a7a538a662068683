use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use log::debug;

use crate::{DescentErr, Result};

/// Read access to named settings.
///
/// This is the only view the optimizer and the objectives have of the configuration.
pub trait Settings {
    /// Returns the raw value stored under `key`, if any.
    fn raw(&self, key: &str) -> Option<&str>;

    fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Returns the value stored under `key`.
    ///
    /// # Returns
    /// A `ConfigKeyMissing` error if the key is absent.
    fn get_string(&self, key: &str) -> Result<String> {
        self.raw(key)
            .map(str::to_string)
            .ok_or_else(|| DescentErr::ConfigKeyMissing {
                key: key.to_string(),
            })
    }

    fn get_f64(&self, key: &str) -> Result<f64> {
        parse(key, self.raw(key))
    }

    fn get_usize(&self, key: &str) -> Result<usize> {
        parse(key, self.raw(key))
    }
}

fn parse<T: FromStr>(key: &str, raw: Option<&str>) -> Result<T> {
    let value = raw.ok_or_else(|| DescentErr::ConfigKeyMissing {
        key: key.to_string(),
    })?;

    value.trim().parse().map_err(|_| DescentErr::ConfigParse {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Flat `key:value` configuration, loaded from files and overridable from the command line.
///
/// Files hold one pair per line, for example:
///
/// ```text
/// optimisation.grad.alpha:0.01
/// optimisation.grad.eps:0.00001
/// ```
///
/// The key ends at the first colon and the value is the rest of the line. Lines without a
/// colon or without a value are ignored and later pairs overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ConfigParams {
    data: BTreeMap<String, String>,
}

impl ConfigParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ConfigParams` holding the pairs of the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut params = Self::new();
        params.merge_file(path)?;
        Ok(params)
    }

    /// Merges the pairs of the file at `path`, overwriting existing keys.
    pub fn merge_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("reading parameter file {}", path.display());

        let text = fs::read_to_string(path)?;
        self.merge_str(&text);
        Ok(())
    }

    /// Merges every `key:value` line of `text`.
    pub fn merge_str(&mut self, text: &str) {
        text.lines().for_each(|line| self.add(line));
    }

    /// Adds a single `key:value` pair, as given on the command line.
    pub fn add(&mut self, pair: &str) {
        let Some((key, value)) = pair.split_once(':') else {
            return;
        };

        if value.is_empty() {
            return;
        }

        self.set(key, value);
    }

    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(old) = self.data.insert(key.to_string(), value.to_string()) {
            debug!("overwriting {key}: {old} -> {value}");
        }
    }

    /// Returns the value stored under `key` parsed as `T`.
    ///
    /// # Returns
    /// A `ConfigKeyMissing` error if the key is absent or a `ConfigParse` error if the value
    /// is not a valid `T`.
    pub fn get<T: FromStr>(&self, key: &str) -> Result<T> {
        parse(key, self.raw(key))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Settings for ConfigParams {
    fn raw(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}
