use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetgenError {
    #[error("A '{entry}' entry is missing the required '{attribute}' attribute in {path} (line {line})")]
    MissingRequiredAttribute {
        entry: String,
        attribute: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Setting '{setting}' declares more than one override for project '{project}'")]
    DuplicateOverride { setting: String, project: String },

    #[error("Unknown environment '{0}' (expected Dev, Qa, Staging, Live or a declared alias)")]
    UnknownEnvironment(String),

    #[error("Environment alias '{alias}' is not declared on setting '{setting}'")]
    UnknownEnvironmentAlias { alias: String, setting: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Setting not found: {0}")]
    UnknownSetting(String),

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings catalog")]
    UnknownKeys(Vec<SetgenError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Generator options: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
