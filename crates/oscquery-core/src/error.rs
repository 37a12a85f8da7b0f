//! Error types for the OSC Query core

use thiserror::Error;

/// Result type alias for core tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Error, Debug)]
pub enum Error {
    /// A value operation addressed an argument slot that does not exist
    #[error("argument index {0} out of range")]
    IndexOutOfRange(usize),

    /// Low-level child insertion collided with an existing name
    #[error("duplicate child: {0}")]
    DuplicateChild(String),

    /// An OSC type tag outside the supported alphabet
    #[error("unknown OSC type code: '{0}'")]
    UnknownTypeCode(char),
}
