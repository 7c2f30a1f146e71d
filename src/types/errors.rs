//! Error types used across Groundwork.
use thiserror::Error;

/// High-level error categories for the engine and its adapters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A probe could not determine current state (e.g. permission denied
    /// reading an existing file). Never silently treated as "unsatisfied".
    #[error("precondition check failed")]
    Probe,
    /// An external mutation returned nonzero or otherwise failed.
    #[error("mutation failed")]
    Mutation,
    /// A required configuration value is missing or malformed; detected
    /// before any step runs.
    #[error("configuration invalid")]
    Config,
}

/// Structured error with a kind and human message.
#[derive(Debug, Error)]
#[error("{kind}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

impl Error {
    pub fn probe(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Probe, msg: msg.into() }
    }

    pub fn mutation(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Mutation, msg: msg.into() }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, msg: msg.into() }
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
