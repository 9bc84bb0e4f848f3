//! Host function registration via Wasmtime linker.
//!
//! Registers the 14 `ethereum` host functions with the Wasmtime `Linker`.
//! Each function:
//! 1. Takes the interface and a memory view from the Caller's `HostContext`
//! 2. Runs the matching `Eei` operation
//! 3. Hands the result back through the exception bridge
//!
//! Pointers and lengths arrive as `u32` and gas amounts as `i64`, matching the
//! signatures in [`HostFunctionTable::ethereum`](crate::host_table::HostFunctionTable::ethereum).

use ewasm_hostapi::{EeiError, Eei, WasmMemory};
use wasmtime::{Caller, Linker};

use crate::error::SandboxError;
use crate::exception;
use crate::host_impl::{with_interface, HostContext};
use crate::host_table::HOST_MODULE;

/// Run one interface operation on behalf of a host function.
fn host_call<R>(
    caller: &mut Caller<'_, HostContext>,
    function: &'static str,
    op: impl FnOnce(&mut dyn Eei, &mut dyn WasmMemory) -> Result<R, EeiError>,
) -> wasmtime::Result<R> {
    let result = with_interface(caller, op);
    exception::bridge(caller, function, result)
}

/// Register all `ethereum` functions with the linker.
pub fn register_host_functions(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    register_gas(linker)?;
    register_environment(linker)?;
    register_call(linker)?;
    register_storage(linker)?;
    register_code(linker)?;
    register_termination(linker)?;
    register_return_data(linker)?;
    Ok(())
}

// ── Gas ──

fn register_gas(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "useGas",
        |mut caller: Caller<'_, HostContext>, amount: i64| {
            host_call(&mut caller, "useGas", |eei, _| eei.use_gas(amount))
        },
    )?;
    linker.func_wrap(
        HOST_MODULE,
        "getGasLeft",
        |mut caller: Caller<'_, HostContext>| {
            host_call(&mut caller, "getGasLeft", |eei, _| eei.get_gas_left())
        },
    )?;
    Ok(())
}

// ── Environment ──

fn register_environment(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "getAddress",
        |mut caller: Caller<'_, HostContext>, result_offset: u32| {
            host_call(&mut caller, "getAddress", |eei, mem| {
                eei.get_address(mem, result_offset)
            })
        },
    )?;
    linker.func_wrap(
        HOST_MODULE,
        "callDataCopy",
        |mut caller: Caller<'_, HostContext>, result_offset: u32, data_offset: u32, length: u32| {
            host_call(&mut caller, "callDataCopy", |eei, mem| {
                eei.call_data_copy(mem, result_offset, data_offset, length)
            })
        },
    )?;
    linker.func_wrap(
        HOST_MODULE,
        "getCallDataSize",
        |mut caller: Caller<'_, HostContext>| {
            host_call(&mut caller, "getCallDataSize", |eei, _| eei.get_call_data_size())
        },
    )?;
    Ok(())
}

// ── Nested Calls ──

fn register_call(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "call",
        |mut caller: Caller<'_, HostContext>,
         gas: i64,
         address_offset: u32,
         value_offset: u32,
         data_offset: u32,
         data_length: u32| {
            host_call(&mut caller, "call", |eei, mem| {
                eei.call(mem, gas, address_offset, value_offset, data_offset, data_length)
            })
        },
    )?;
    Ok(())
}

// ── Storage ──

fn register_storage(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "storageStore",
        |mut caller: Caller<'_, HostContext>, path_offset: u32, value_offset: u32| {
            host_call(&mut caller, "storageStore", |eei, mem| {
                eei.storage_store(mem, path_offset, value_offset)
            })
        },
    )?;
    linker.func_wrap(
        HOST_MODULE,
        "storageLoad",
        |mut caller: Caller<'_, HostContext>, path_offset: u32, result_offset: u32| {
            host_call(&mut caller, "storageLoad", |eei, mem| {
                eei.storage_load(mem, path_offset, result_offset)
            })
        },
    )?;
    Ok(())
}

// ── Code ──

fn register_code(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "codeCopy",
        |mut caller: Caller<'_, HostContext>, result_offset: u32, code_offset: u32, length: u32| {
            host_call(&mut caller, "codeCopy", |eei, mem| {
                eei.code_copy(mem, result_offset, code_offset, length)
            })
        },
    )?;
    linker.func_wrap(
        HOST_MODULE,
        "getCodeSize",
        |mut caller: Caller<'_, HostContext>| {
            host_call(&mut caller, "getCodeSize", |eei, _| eei.get_code_size())
        },
    )?;
    Ok(())
}

// ── Termination ──

fn register_termination(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "finish",
        |mut caller: Caller<'_, HostContext>, data_offset: u32, length: u32| {
            host_call(&mut caller, "finish", |eei, mem| eei.finish(mem, data_offset, length))
        },
    )?;
    linker.func_wrap(
        HOST_MODULE,
        "revert",
        |mut caller: Caller<'_, HostContext>, data_offset: u32, length: u32| {
            host_call(&mut caller, "revert", |eei, mem| eei.revert(mem, data_offset, length))
        },
    )?;
    Ok(())
}

// ── Return Data ──

fn register_return_data(linker: &mut Linker<HostContext>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "getReturnDataSize",
        |mut caller: Caller<'_, HostContext>| {
            host_call(&mut caller, "getReturnDataSize", |eei, _| {
                eei.get_return_data_size()
            })
        },
    )?;
    linker.func_wrap(
        HOST_MODULE,
        "returnDataCopy",
        |mut caller: Caller<'_, HostContext>, result_offset: u32, data_offset: u32, length: u32| {
            host_call(&mut caller, "returnDataCopy", |eei, mem| {
                eei.return_data_copy(mem, result_offset, data_offset, length)
            })
        },
    )?;
    Ok(())
}
