//! Error types for the scene core

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building or configuring a scene
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid colour {0:?}: expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown variant {0:?}: expected \"classic\" or \"sections\"")]
    UnknownVariant(String),

    #[error("Gradient image has no pixels")]
    EmptyGradient,

    #[error("Gradient decode error: {0}")]
    GradientDecode(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
