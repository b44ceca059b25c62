//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolithTypesError {
    /// A construction-time invariant of a geometry was violated.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// The operation is not defined for the geometry variant.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}
