//! The generator's own options.
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Options file          setgen.toml (optional)
//!        ↑ overridden by
//! Environment vars      SETGEN_CATALOG, SETGEN_OUTPUT_DIR, SETGEN_STRICT
//!        ↑ overridden by
//! Overrides             builder methods / CLI flags
//! ```

use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::error::SetgenError;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Path to the settings catalog.
    #[config(default = "settings.toml", env = "SETGEN_CATALOG")]
    pub catalog: PathBuf,

    /// Directory that generated files are written under.
    #[config(default = ".", env = "SETGEN_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Reject unknown keys in the catalog.
    #[config(default = true, env = "SETGEN_STRICT")]
    pub strict: bool,
}

/// Everything needed to resolve [`GeneratorConfig`]. Only the options file
/// and (when enabled) the process environment are read.
pub struct OptionsInput<'a> {
    /// `(key, value)` pairs with the highest priority.
    pub overrides: Vec<(&'static str, Value)>,
    pub file: Option<&'a Path>,
    pub env: bool,
}

pub fn resolve_options(input: OptionsInput<'_>) -> Result<GeneratorConfig, SetgenError> {
    let table: Table = input
        .overrides
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    let layer: <GeneratorConfig as Config>::Layer = Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| SetgenError::InvalidValue {
            key: "<overrides>".into(),
            reason: e.to_string(),
        })?;

    let mut builder = GeneratorConfig::builder().preloaded(layer);
    if input.env {
        builder = builder.env();
    }
    if let Some(file) = input.file {
        builder = builder.file(file);
    }
    builder.load().map_err(SetgenError::from)
}
