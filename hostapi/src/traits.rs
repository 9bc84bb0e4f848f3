//! Environment interface trait.
//!
//! One method per function the sandbox exports under the `ethereum` host
//! module. Offsets and lengths arrive exactly as the guest passed them; memory
//! access goes through the [`WasmMemory`] view the sandbox supplies for the
//! duration of the call.
//!
//! `finish` and `revert` never return `Ok`: on success they return
//! [`EeiError::end_execution`], which the sandbox turns into a normal stop.

use crate::error::EeiError;
use crate::memory::WasmMemory;
use crate::types::ExecutionResult;

pub trait Eei {
    /// Charge `amount` gas. Negative amounts are `ArgumentOutOfRange`.
    fn use_gas(&mut self, amount: i64) -> Result<(), EeiError>;

    /// Write the executing contract's address at `result_offset`.
    fn get_address(&mut self, memory: &mut dyn WasmMemory, result_offset: u32) -> Result<(), EeiError>;

    /// Dispatch a nested call. Returns 0 on success, 1 on failure, 2 on revert.
    fn call(
        &mut self,
        memory: &mut dyn WasmMemory,
        gas: i64,
        address_offset: u32,
        value_offset: u32,
        data_offset: u32,
        data_length: u32,
    ) -> Result<u32, EeiError>;

    fn call_data_copy(
        &mut self,
        memory: &mut dyn WasmMemory,
        result_offset: u32,
        data_offset: u32,
        length: u32,
    ) -> Result<(), EeiError>;

    fn get_call_data_size(&mut self) -> Result<u32, EeiError>;

    fn get_gas_left(&mut self) -> Result<i64, EeiError>;

    fn storage_store(
        &mut self,
        memory: &mut dyn WasmMemory,
        path_offset: u32,
        value_offset: u32,
    ) -> Result<(), EeiError>;

    fn storage_load(
        &mut self,
        memory: &mut dyn WasmMemory,
        path_offset: u32,
        value_offset: u32,
    ) -> Result<(), EeiError>;

    fn code_copy(
        &mut self,
        memory: &mut dyn WasmMemory,
        result_offset: u32,
        code_offset: u32,
        length: u32,
    ) -> Result<(), EeiError>;

    fn get_code_size(&mut self) -> Result<u32, EeiError>;

    /// Stop successfully with the given return data.
    fn finish(&mut self, memory: &mut dyn WasmMemory, data_offset: u32, length: u32) -> Result<(), EeiError>;

    /// Stop with a revert and the given return data.
    fn revert(&mut self, memory: &mut dyn WasmMemory, data_offset: u32, length: u32) -> Result<(), EeiError>;

    /// Size of the last nested call's output.
    fn get_return_data_size(&mut self) -> Result<u32, EeiError>;

    fn return_data_copy(
        &mut self,
        memory: &mut dyn WasmMemory,
        result_offset: u32,
        data_offset: u32,
        length: u32,
    ) -> Result<(), EeiError>;

    /// Gas still available to the invocation.
    fn gas_left(&self) -> u64;

    /// Consume the interface and produce the invocation's result.
    fn into_result(self: Box<Self>) -> ExecutionResult;
}
