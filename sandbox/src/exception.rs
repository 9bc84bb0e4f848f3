//! Exception bridge: carrying interface failures across the engine boundary.
//!
//! A host function that fails cannot unwind through compiled guest code with
//! its own error type. Instead the failure is parked in the invocation's
//! [`PendingException`], the guest is forced to trap, and the lifecycle
//! re-raises the parked error after teardown. `finish`/`revert` are the
//! exception: they unwind with their own signal and are not parked.

use ewasm_hostapi::EeiError;
use tracing::{debug, warn};
use wasmtime::{Caller, Trap};

use crate::context_stack;
use crate::host_impl::HostContext;

/// Slot holding at most one failure raised by a host function.
#[derive(Debug, Default)]
pub struct PendingException {
    slot: Option<EeiError>,
}

impl PendingException {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `err`. The first capture wins; later ones are logged and dropped.
    pub fn capture(&mut self, err: EeiError) {
        match &self.slot {
            Some(existing) => {
                warn!(
                    kept = %existing,
                    dropped = %err,
                    "pending exception already set, dropping later failure"
                );
            }
            None => self.slot = Some(err),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Empty the slot, returning what it held.
    pub fn take(&mut self) -> Option<EeiError> {
        self.slot.take()
    }
}

/// Convert the result of an interface operation into what a host function
/// hands back to the engine.
pub(crate) fn bridge<R>(
    caller: &mut Caller<'_, HostContext>,
    function: &'static str,
    result: Result<R, EeiError>,
) -> wasmtime::Result<R> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_end_execution() => {
            debug!(function, "execution ended by host function");
            Err(wasmtime::Error::new(err))
        }
        Err(err) => {
            let frame = context_stack::top();
            debug!(
                function,
                depth = ?frame.map(|f| f.depth),
                gas_limit = ?frame.map(|f| f.gas_limit),
                kind = %err.kind(),
                message = %err.message,
                "host function failed"
            );
            let context = caller.data_mut();
            context.pending.capture(err);
            context.release_memory();
            Err(wasmtime::Error::new(Trap::UnreachableCodeReached))
        }
    }
}

/// How a guest call finished, as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Completion {
    /// `main` returned normally.
    Returned,
    /// `finish` or `revert` unwound the guest.
    Ended,
    /// The guest trapped. The pending slot, if set, holds the real cause.
    Trapped(String),
}

pub(crate) fn classify(result: wasmtime::Result<()>) -> Completion {
    let err = match result {
        Ok(()) => return Completion::Returned,
        Err(err) => err,
    };
    if let Some(eei) = err.downcast_ref::<EeiError>() {
        if eei.is_end_execution() {
            return Completion::Ended;
        }
    }
    match err.downcast_ref::<Trap>() {
        Some(trap) => Completion::Trapped(trap.to_string()),
        None => Completion::Trapped(format!("{:#}", err)),
    }
}
