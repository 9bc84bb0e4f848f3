//! Sandbox error types.

use ewasm_hostapi::{EeiError, ErrorKind};

/// The single typed error an invocation can end with.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Wasmtime engine configuration error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// The contract is malformed, unlinkable or lacks `memory`/`main`.
    #[error("contract validation failed: {0}")]
    ValidationError(String),

    /// Error raised by the environment interface during execution,
    /// re-raised after teardown.
    #[error("{0}")]
    Eei(#[from] EeiError),

    /// The guest trapped with no more specific cause.
    #[error("guest trapped: {0}")]
    GuestTrapped(String),

    /// Too many invocations nested on this thread.
    #[error("call depth {depth} exceeds the sandbox limit")]
    CallDepthExceeded { depth: usize },

    /// A bridge or engine invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SandboxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Wasmtime(_) | Self::Internal(_) => ErrorKind::InternalError,
            Self::ValidationError(_) => ErrorKind::ContractValidationFailure,
            Self::Eei(err) => err.kind(),
            Self::GuestTrapped(_) | Self::CallDepthExceeded { .. } => ErrorKind::VMTrap,
        }
    }
}
