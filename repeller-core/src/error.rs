//! Common error types for the repeller core.

use thiserror::Error;

/// Common result type for repeller core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for synthesis, scoring and tone asset management
#[derive(Error, Debug)]
pub enum Error {
    /// Non-positive frequency or duration handed to the synthesizer
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Pest range with max below min handed to the scorer
    #[error("invalid pest range: max {max} kHz is below min {min} kHz")]
    InvalidRange { min: f32, max: f32 },

    /// Tone asset file could not be created or written
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// WAV container encoding or decoding error
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// Pest catalog file could not be parsed
    #[error("catalog error: {0}")]
    Catalog(#[from] serde_json::Error),
}
