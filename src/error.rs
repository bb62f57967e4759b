//! Error types and result aliases for the tracebuster library.
//!
//! Tracing itself never fails: values that cannot be printed, frames outside
//! the workspace, and captures that panic are all absorbed by the tracer.
//! What does surface as [`TracerError`] is misuse of the scope lifecycle and
//! bad configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TracerError {
    #[error("a trace scope is already active on this thread")]
    ScopeAlreadyActive,

    #[error("the line hook installed by this scope was replaced before the scope closed")]
    HookDisplaced,

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TracerError>;
