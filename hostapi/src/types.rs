//! Call message and execution result types.
//!
//! Byte layouts follow the ewasm conventions: addresses are 20 bytes, storage
//! keys and values are 32 bytes, call values are 16-byte little-endian u128s.

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;
/// Length of a storage key or value in bytes.
pub const WORD_LEN: usize = 32;
/// Length of a call value in bytes.
pub const VALUE_LEN: usize = 16;
/// Maximum message depth at which `call` still dispatches.
pub const MAX_CALL_DEPTH: u32 = 1024;

pub type Address = [u8; ADDRESS_LEN];
pub type Word = [u8; WORD_LEN];
pub type Value = [u8; VALUE_LEN];

pub const ZERO_ADDRESS: Address = [0u8; ADDRESS_LEN];
pub const ZERO_WORD: Word = [0u8; WORD_LEN];
pub const ZERO_VALUE: Value = [0u8; VALUE_LEN];

/// A call into a contract: who is calling, what is being called, with which
/// input and how much gas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Address,
    pub destination: Address,
    pub value: Value,
    pub input: Vec<u8>,
    pub gas: u64,
    /// Nesting depth; 0 for a top-level call.
    pub depth: u32,
    /// Static calls may not modify state.
    pub is_static: bool,
}

impl Message {
    /// A top-level, non-static call with zero value.
    pub fn new(sender: Address, destination: Address, input: Vec<u8>, gas: u64) -> Self {
        Self {
            sender,
            destination,
            value: ZERO_VALUE,
            input,
            gas,
            depth: 0,
            is_static: false,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value != ZERO_VALUE
    }
}

/// The accumulated outcome of one contract invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Data passed to `finish` or `revert`; empty if `main` simply returned.
    pub return_data: Vec<u8>,
    pub gas_used: u64,
    pub gas_left: u64,
    /// Set when the contract stopped through `revert`.
    pub is_revert: bool,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        !self.is_revert
    }
}

/// Status code returned to the guest by `call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CallStatus {
    Success = 0,
    Failure = 1,
    Revert = 2,
}

impl CallStatus {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// What a nested call produced, as reported by the [`Host`](crate::Host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub status: CallStatus,
    pub output: Vec<u8>,
    pub gas_left: u64,
}

impl CallOutcome {
    /// A failed call that consumed all forwarded gas and returned nothing.
    pub fn failure() -> Self {
        Self {
            status: CallStatus::Failure,
            output: Vec::new(),
            gas_left: 0,
        }
    }
}
