//! Error types for file-backed operations
//!
//! Gameplay never fails: defeat, death and level completion are state
//! transitions. Errors only come from reading and writing files.

use std::path::PathBuf;

use thiserror::Error;

/// A single level-file line that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("unknown record tag `{0}`")]
    UnknownTag(String),
    #[error("record `{tag}` is missing field `{field}`")]
    MissingField { tag: &'static str, field: &'static str },
    #[error("record `{tag}` has invalid {field} `{value}`")]
    InvalidNumber {
        tag: &'static str,
        field: &'static str,
        value: String,
    },
}

/// Failure while loading a level or save file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },
    #[error("unknown built-in level {0}")]
    UnknownLevel(u32),
}

/// Failure while writing a save file
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("custom levels cannot be saved")]
    CustomLevel,
}

/// Failure while persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Json(#[from] serde_json::Error),
}
