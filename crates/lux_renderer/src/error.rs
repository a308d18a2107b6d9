//! Error types for rendering and image export.

use thiserror::Error;

/// Errors that can occur while configuring a render or writing its output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid render configuration: {0}")]
    Config(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
