//! Gas schedule for host calls.
//!
//! Charged by [`EthereumInterface`](crate::EthereumInterface) when interface
//! metering is enabled. Guest compute is metered separately through `useGas`
//! calls injected into the contract.

/// Informational calls (`getAddress`, `getCallDataSize`, `getGasLeft`, ...).
pub const G_BASE: u64 = 2;

/// Base cost of a memory copy.
pub const G_VERY_LOW: u64 = 3;

/// Per 32-byte word cost of a memory copy.
pub const G_COPY_PER_WORD: u64 = 3;

/// `storageLoad`.
pub const G_STORAGE_LOAD: u64 = 200;

/// `storageStore` turning a zero slot non-zero.
pub const G_STORAGE_STORE_CREATE: u64 = 20_000;

/// `storageStore` on any other slot.
pub const G_STORAGE_STORE_UPDATE: u64 = 5_000;

/// `call` base cost.
pub const G_CALL: u64 = 700;

/// Surcharge for a `call` that transfers value.
pub const G_VALUE_TRANSFER: u64 = 9_000;

/// Number of 32-byte words needed to hold `len` bytes.
pub fn words(len: usize) -> u64 {
    (len as u64).div_ceil(32)
}

/// Cost of copying `len` bytes into or out of linear memory.
pub fn copy_cost(len: usize) -> u64 {
    G_VERY_LOW.saturating_add(words(len).saturating_mul(G_COPY_PER_WORD))
}
