//! `ewasm-hostapi`: the Ethereum environment interface (EEI) for the ewasm
//! sandbox.
//!
//! This crate defines what sandboxed contracts can do to the outside world and
//! how it is charged. It provides:
//!
//! - `Eei` trait: one method per `ethereum` host function
//! - `EthereumInterface`: reference `Eei` backed by a `Host`
//! - `Host` trait: storage and nested call dispatch
//! - `MemHost`: in-memory `Host` for testing
//! - `WasmMemory`: bounds-checked view of a module's linear memory
//! - `GasMeter` and the `gas` schedule
//! - `EeiError` / `ErrorKind`: the error kinds that cross the sandbox boundary
//!
//! The crate knows nothing about the WebAssembly engine; the sandbox adapts
//! engine memory and traps onto these types.

pub mod error;
pub mod types;
pub mod gas;
pub mod gas_meter;
pub mod memory;
pub mod host;
pub mod mem_host;
pub mod traits;
pub mod interface;

// Re-export commonly used types at the crate root.
pub use error::{EeiError, ErrorKind};
pub use types::{Address, CallOutcome, CallStatus, ExecutionResult, Message, Word};
pub use gas_meter::GasMeter;
pub use memory::{VecMemory, WasmMemory, PAGE_SIZE};
pub use host::Host;
pub use mem_host::MemHost;
pub use traits::Eei;
pub use interface::EthereumInterface;
