//! Server error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    /// A listener could not bind its port; fatal at startup
    #[error("bind failed: {0}")]
    Bind(String),

    /// Lifecycle misuse, e.g. start while already running
    #[error("invalid lifecycle transition: {0}")]
    InvalidState(String),

    #[error("mdns error: {0}")]
    Mdns(String),

    #[error("core error: {0}")]
    Core(#[from] oscquery_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
