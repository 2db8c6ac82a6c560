use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagfigError {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Flag '{0}' has an empty value")]
    EmptyValue(String),

    #[error("Flag '{0}' is already registered")]
    DuplicateFlag(String),

    #[error("Invalid flag name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Flag '{name}' conflicts with '{other}': a key cannot also be a table")]
    NameConflict { name: String, other: String },

    #[error("Config buffer is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Cli(#[from] clap::Error),
}
