use thiserror::Error;

/// Errors raised while handling plugin file inputs
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File has no content: {0}")]
    MissingContent(String),

    #[error("File not found: {0}")]
    NotFound(String),
}
