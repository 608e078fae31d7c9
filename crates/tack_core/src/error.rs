//! Core error types
//!
//! None of these reach the caller of the boundary lifecycle: every failure in
//! the detector is handled locally and logged at debug level. They exist so
//! that internal steps can be written with `?`.

use tack_platform::{ElementId, PlatformError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TackError {
    /// The host rejected an operation
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// No viewport root has been set on the context yet
    #[error("No viewport root set")]
    NoViewportRoot,

    /// A marker is not in the sentinel registry
    #[error("Marker {0:?} is not registered")]
    NotRegistered(ElementId),

    /// The section has no sticky target registered
    #[error("Boundary section has no sticky target")]
    NoStickyTarget,
}

pub type Result<T> = std::result::Result<T, TackError>;
