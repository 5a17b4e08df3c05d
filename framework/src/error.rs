use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a file into a parsed manifest. The file is skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid discovery root {0:?}")]
    InvalidRoot(PathBuf),
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("couldn't read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("couldn't parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unrecognised extension {0:?}")]
    Extension(String),
}

/// A module that doesn't satisfy its shape contract.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("module name is empty")]
    EmptyName,
    #[error("missing or malformed field: {0}")]
    Malformed(String),
    #[error("no {kind} handler named {symbol:?} in the catalog")]
    UnknownHandler { kind: &'static str, symbol: String },
    #[error("unknown argument shape {0:?}")]
    UnknownShape(String),
    #[error("unknown event {0:?}")]
    UnknownEvent(String),
    #[error("action name is empty")]
    EmptyAction,
    #[error("invalid command definition: {0}")]
    InvalidCommand(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command {0:?} not found")]
    CommandNotFound(String),
}

/// Outcome of a failed helper or interaction dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no helper named {0:?}")]
    UnknownHelper(String),
    #[error("helper {0:?} needs an interaction but none was given")]
    MissingInteraction(String),
    #[error(transparent)]
    Lookup(#[from] RegistryError),
    #[error("{name} failed: {source}")]
    Failed {
        name: String,
        #[source]
        source: crate::Error,
    },
    #[error("{0} panicked")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is not a valid snowflake: {value:?}")]
    InvalidId { field: &'static str, value: String },
}
