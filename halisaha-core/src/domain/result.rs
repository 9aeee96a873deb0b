//! Error type of the core library and the `--json` envelope

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Core library error type
///
/// A lookup miss is never an error here: absent cells come back as `None`
/// or as an outcome variant.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store lock poisoned: {0}")]
    Lock(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Category recorded in the event log instead of the message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Validation(_) => "validation",
            Self::Lock(_) => "lock",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

/// A desk action turned down, with a message that may name a person
///
/// Only `kind` and `cell_key` reach the event log.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Refusal {
    pub kind: &'static str,
    pub cell_key: Option<String>,
    message: String,
}

impl Refusal {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            cell_key: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, key: impl ToString) -> Self {
        self.cell_key = Some(key.to_string());
        self
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// What a command prints under `--json`
///
/// Exactly one of `data` and `error` is set. `context` carries the cell key
/// or other values a script needs to react to a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: Map::new(),
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Map::new(),
        }
    }

    /// Attach one context value
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}
