//! Immediate renderer error type

use fixfunc_core::BackendError;

/// Error returned by every immediate-mode operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImmediateError {
    /// Call made in a state where it is not allowed; nothing was changed
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
    /// Argument inconsistent with the rest of the call
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    /// Resource creation or upload failed in the backend
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T, E = ImmediateError> = std::result::Result<T, E>;
