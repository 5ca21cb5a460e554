//! Error types for the input layer.

use thiserror::Error;

/// Input-layer error type.
///
/// Misconfigured bindings and unknown action names never error; they degrade
/// to "inactive" or a logged no-op. Only source registration can fail.
#[derive(Error, Debug)]
pub enum Error {
    /// A source with this name is already registered.
    #[error("source '{0}' is already registered")]
    DuplicateSource(String),

    /// No source registered under this name.
    #[error("no source named '{0}'")]
    UnknownSource(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
