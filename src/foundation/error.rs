use std::fmt;

/// Result alias used across the crate.
pub type FlipbookResult<T> = Result<T, FlipbookError>;

/// Which end of the frame sequence a navigation request ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// `prev_frame` at index 0.
    Start,
    /// `next_frame` at the last index.
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("beginning of frames"),
            Self::End => f.write_str("end of frames"),
        }
    }
}

/// Every failure and notice the editor core can report.
///
/// `CapacityExceeded` and `BoundaryReached` are notices: the operation was a no-op and the
/// caller only needs to tell the user. Everything else aborts the operation that raised it.
#[derive(thiserror::Error, Debug)]
pub enum FlipbookError {
    /// `add_frame`/`duplicate_frame` at maximum capacity.
    #[error("maximum number of frames reached ({max})")]
    CapacityExceeded {
        /// The capacity that was hit.
        max: usize,
    },

    /// `next_frame`/`prev_frame` at either end of the sequence.
    #[error("{0}")]
    BoundaryReached(Boundary),

    /// Destination directory or file could not be created, read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// The video encoder rejected a frame or failed to finalize.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Malformed dimensions, frame rate or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Persisted payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Contextual failure from a lower layer.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipbookError {
    /// Build a [`FlipbookError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`FlipbookError::Encoding`].
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`FlipbookError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlipbookError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for the recoverable no-op conditions that are surfaced as user notices.
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. } | Self::BoundaryReached(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
