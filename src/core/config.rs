//! File locations for the store and the conversion pipeline
//!
//! ```toml
//! store_path = "copies/vehicles.bin"
//! input_dir  = "data_in"
//! output_dir = "data_out"
//! stem       = "vehicles"
//! ```

use crate::adapters::FormatKind;
use crate::error::{IoContext, Operation, Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Record store used by the menu and the store commands
    pub store_path: PathBuf,

    /// Directory holding `{stem}.csv`, `{stem}.xml`, `{stem}.json`, `{stem}.bin`
    pub input_dir: PathBuf,

    /// Directory receiving `{stem}{TAG}.{ext}` conversions
    pub output_dir: PathBuf,

    /// Base file name shared by sources and outputs
    pub stem: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_path: PathBuf::from("copies/vehicles.bin"),
            input_dir: PathBuf::from("data_in"),
            output_dir: PathBuf::from("data_out"),
            stem: "vehicles".to_string(),
        }
    }
}

impl Config {
    /// Load from a TOML file; absent keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).io_context(Operation::Read, path)?;
        Self::from_toml(path, &text)
    }

    fn from_toml(path: &Path, text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|source| StoreError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stem.trim().is_empty() {
            return Err(StoreError::InvalidInput("stem cannot be empty".to_string()));
        }
        if self.stem.contains(['/', '\\']) {
            return Err(StoreError::InvalidInput(format!(
                "stem '{}' must be a bare file name",
                self.stem
            )));
        }
        Ok(())
    }

    /// Source file for `kind`, e.g. `data_in/vehicles.csv`
    pub fn source_path(&self, kind: FormatKind) -> PathBuf {
        self.input_dir
            .join(format!("{}.{}", self.stem, kind.extension()))
    }

    /// Output file for records read from `source` written as `target`,
    /// e.g. `data_out/vehiclesCSV.json`
    pub fn output_path(&self, source: FormatKind, target: FormatKind) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}.{}",
            self.stem,
            source.tag(),
            target.extension()
        ))
    }
}
