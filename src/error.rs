//! Error types for the vidfind service.

/// Top-level error type for the API service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded, parsed or saved.
    #[error("config error: {0}")]
    Config(String),

    /// Status-check store error.
    #[error("store error: {0}")]
    Store(#[from] crate::status::StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server could not be started.
    #[error("server error: {0}")]
    Server(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
