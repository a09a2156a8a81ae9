//! Backend error type

/// Failure reported by a [`GraphicsBackend`](crate::GraphicsBackend)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Buffer, binding or other resource allocation failed
    #[error("out of memory while creating {0}")]
    OutOfMemory(&'static str),
    /// A handle that the backend does not know about was passed in
    #[error("invalid {kind} handle {raw}")]
    InvalidHandle { kind: &'static str, raw: u32 },
    /// The device cannot perform the requested operation
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    /// Any other device-level failure
    #[error("device error: {0}")]
    Device(String),
}
