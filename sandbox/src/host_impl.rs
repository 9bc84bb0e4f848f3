//! Per-invocation state held in the Wasmtime Store.
//!
//! `HostContext` owns the environment interface for one contract invocation,
//! the handle to the module's linear memory once it is bound, the pending
//! exception slot and the store's resource limits. It is created fresh for
//! every invocation and dropped with the store at teardown.

use ewasm_hostapi::{EeiError, Eei, WasmMemory};
use wasmtime::{Caller, Memory, StoreLimits};

use crate::exception::PendingException;
use crate::memory::MemoryBridge;

/// Per-invocation mutable state held in the Wasmtime `Store`.
pub struct HostContext {
    /// Interface every host function of this invocation operates on.
    pub interface: Box<dyn Eei>,
    /// Exported linear memory, `None` before binding and after release.
    pub memory: Option<Memory>,
    /// Failure parked by a host function, re-raised after teardown.
    pub pending: PendingException,
    /// Memory growth limits enforced by the store limiter.
    pub limits: StoreLimits,
}

impl HostContext {
    pub fn new(interface: Box<dyn Eei>, limits: StoreLimits) -> Self {
        Self {
            interface,
            memory: None,
            pending: PendingException::new(),
            limits,
        }
    }

    pub fn bind_memory(&mut self, memory: Memory) {
        self.memory = Some(memory);
    }

    /// Drop the memory handle. Later accesses fail with `InvalidMemoryAccess`.
    pub fn release_memory(&mut self) {
        self.memory = None;
    }
}

/// Run `op` against the caller's interface with a view of its linear memory.
pub(crate) fn with_interface<R>(
    caller: &mut Caller<'_, HostContext>,
    op: impl FnOnce(&mut dyn Eei, &mut dyn WasmMemory) -> Result<R, EeiError>,
) -> Result<R, EeiError> {
    let memory = caller.data().memory;
    match memory {
        Some(memory) => {
            let (data, context) = memory.data_and_store_mut(&mut *caller);
            let mut view = MemoryBridge::bound(data);
            op(context.interface.as_mut(), &mut view)
        }
        None => {
            let mut view = MemoryBridge::released();
            op(caller.data_mut().interface.as_mut(), &mut view)
        }
    }
}
