//! Platform error types

use thiserror::Error;

use crate::element::ElementId;
use crate::observe::ObserverId;

/// Errors reported by a host platform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The element handle does not refer to a live element
    #[error("Unknown element: {0:?}")]
    UnknownElement(ElementId),

    /// The element exists but is not attached to the document, so it has no
    /// computed style or layout yet
    #[error("Element {0:?} is not attached")]
    Detached(ElementId),

    /// The observer handle does not refer to a live observer
    #[error("Unknown observer: {0:?}")]
    UnknownObserver(ObserverId),

    /// An observer was configured without any thresholds
    #[error("Observer requires at least one threshold")]
    NoThresholds,

    /// A length could not be parsed
    #[error("Invalid length '{0}'")]
    InvalidLength(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
