//! Error types raised by the Ethereum environment interface.
//!
//! Every EEI operation returns `Result<_, EeiError>`. The sandbox decides how
//! each kind crosses the engine boundary: `EndExecution` unwinds the guest as a
//! successful stop, everything else is parked in the pending exception slot and
//! re-raised once the instance has been torn down.

use std::fmt;

/// Classification of an EEI or bridge failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An invariant of the bridge or the engine was violated. Always a bug.
    InternalError,
    /// Generic engine-level trap with no more specific classification.
    VMTrap,
    /// A host function received an argument outside its domain.
    ArgumentOutOfRange,
    /// Gas was exhausted.
    OutOfGas,
    /// The contract module is malformed, unlinkable or lacks its entry points.
    ContractValidationFailure,
    /// An EEI memory access fell outside linear memory or a source buffer.
    InvalidMemoryAccess,
    /// `finish` or `revert` was called. Not a failure.
    EndExecution,
    /// A state-modifying operation was attempted in a static call.
    StaticModeViolation,
}

impl ErrorKind {
    /// Returns true for the benign finish/revert unwind signal.
    pub fn is_end_execution(self) -> bool {
        matches!(self, Self::EndExecution)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InternalError => "InternalError",
            Self::VMTrap => "VMTrap",
            Self::ArgumentOutOfRange => "ArgumentOutOfRange",
            Self::OutOfGas => "OutOfGas",
            Self::ContractValidationFailure => "ContractValidationFailure",
            Self::InvalidMemoryAccess => "InvalidMemoryAccess",
            Self::EndExecution => "EndExecution",
            Self::StaticModeViolation => "StaticModeViolation",
        };
        f.write_str(name)
    }
}

/// Error returned by EEI operations: a kind plus a descriptive message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct EeiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EeiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn out_of_gas() -> Self {
        Self::new(ErrorKind::OutOfGas, "out of gas")
    }

    pub fn invalid_memory_access(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidMemoryAccess, message)
    }

    pub fn argument_out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArgumentOutOfRange, message)
    }

    pub fn static_mode_violation(operation: &str) -> Self {
        Self::new(
            ErrorKind::StaticModeViolation,
            format!("{} is not allowed in a static call", operation),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// The finish/revert unwind signal.
    pub fn end_execution() -> Self {
        Self::new(ErrorKind::EndExecution, "execution ended")
    }

    pub fn is_end_execution(&self) -> bool {
        self.kind.is_end_execution()
    }
}
