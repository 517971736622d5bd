//! Internal error type for invariant violations inside the toolchain.

/// Result alias for operations that can only fail because of a bug in Kiln.
pub type KilnResult<T> = Result<T, InternalError>;

/// An invariant violation inside Kiln itself, never caused by user input.
///
/// Raised when two processing stages disagree about data they should share,
/// e.g. the loading pass meeting a pin class the discovery pass never sized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the broken invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
