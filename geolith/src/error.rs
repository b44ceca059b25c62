//! Error types used by the crate.

use geolith_types::error::GeolithTypesError;
use thiserror::Error;

/// Geolith error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeolithError {
    /// The input text could not be turned into a geometry.
    #[error("failed to parse {format}: {reason} (at `{fragment}`)")]
    Parse {
        /// Name of the format.
        format: &'static str,
        /// Piece of the input the error relates to.
        fragment: String,
        /// What went wrong.
        reason: String,
    },
    /// No adapter is registered for the format name.
    #[error("unknown format: {0}")]
    UnknownFormat(String),
    /// The geometry cannot be represented in the target format.
    #[error("failed to write geometry: {0}")]
    Write(String),
    /// A geometry invariant was violated.
    #[error(transparent)]
    Geometry(#[from] GeolithTypesError),
}

impl GeolithError {
    pub(crate) fn parse(
        format: &'static str,
        fragment: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let mut fragment = fragment.into();
        if fragment.len() > MAX_FRAGMENT_LEN {
            let mut end = MAX_FRAGMENT_LEN;
            while !fragment.is_char_boundary(end) {
                end -= 1;
            }
            fragment.truncate(end);
            fragment.push_str("...");
        }

        Self::Parse {
            format,
            fragment,
            reason: reason.into(),
        }
    }
}

const MAX_FRAGMENT_LEN: usize = 120;
