//! Source/target configuration.
//!
//! A configuration file is a flat JSON object naming the two trees:
//!
//! ```json
//! { "source_dir": "/data/photos", "target_dir": "/mnt/backup/photos" }
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up next to the executable when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// The two directories a run mirrors between.
///
/// Read once at startup and never mutated. Missing keys load as empty
/// paths and are rejected by [`Config::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Tree to read from
    #[serde(default)]
    pub source_dir: PathBuf,
    /// Tree to write into
    #[serde(default)]
    pub target_dir: PathBuf,
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigRead`] if the file cannot be read
    /// - [`Error::ConfigParse`] if it is not a JSON object of strings
    /// - [`Error::ConfigMissing`] if either directory is empty
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both directories are specified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMissing`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(Error::ConfigMissing {
                field: "source_dir",
            });
        }
        if self.target_dir.as_os_str().is_empty() {
            return Err(Error::ConfigMissing {
                field: "target_dir",
            });
        }
        Ok(())
    }
}
