//! Error types for the benchmark harness and renderer adapters

use thiserror::Error;

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a benchmark
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing command-line input
    #[error("Usage error: {0}")]
    Usage(String),

    /// Missing or unusable process-wide configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the input document or writing an artifact failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A renderer backend could not be constructed or acquired
    #[error("Renderer initialization failed: {0}")]
    Init(String),

    /// A single render call failed
    #[error("Rendering failed: {0}")]
    Render(String),
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Render(err.to_string())
    }
}
