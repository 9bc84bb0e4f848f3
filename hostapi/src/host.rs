//! Blockchain state collaborator.
//!
//! `Host` is what the environment interface talks to for anything that lives
//! outside the running contract: persistent storage and nested call dispatch.
//! Implementations:
//! - `MemHost` (this crate): in-memory storage, calls dispatched to an
//!   optional handler
//! - embedders running nested contracts route `call` back into the sandbox

use crate::error::EeiError;
use crate::types::{Address, CallOutcome, Message, Word};

pub trait Host {
    /// Read a storage slot of `address`. Missing slots read as zero.
    fn get_storage(&self, address: &Address, key: &Word) -> Result<Word, EeiError>;

    /// Write a storage slot of `address`.
    fn set_storage(&mut self, address: &Address, key: &Word, value: &Word) -> Result<(), EeiError>;

    /// Run a nested call described by `msg`.
    ///
    /// Failures of the callee are reported through [`CallOutcome::status`],
    /// never as an `Err`; `Err` is reserved for host-side faults.
    fn call(&mut self, msg: &Message) -> Result<CallOutcome, EeiError>;
}
