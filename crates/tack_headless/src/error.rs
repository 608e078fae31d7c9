//! Scene error types

use tack_platform::PlatformError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    /// The scene file is not valid TOML or does not match the schema
    #[error("Failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),

    /// A length field could not be parsed
    #[error("Invalid {field} in {section}: {source}")]
    InvalidLength {
        section: String,
        field: &'static str,
        #[source]
        source: PlatformError,
    },

    /// The viewport has no area
    #[error("Viewport must have a positive size, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// The headless host rejected an operation
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

pub type Result<T> = std::result::Result<T, SceneError>;
