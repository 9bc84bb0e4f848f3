//! Reference environment interface backed by a [`Host`].
//!
//! `EthereumInterface` holds the per-call state of one contract invocation:
//! the message, the contract code, the gas meter, the output of the last
//! nested call and the accumulated result. It is created fresh for every
//! invocation and consumed by [`Eei::into_result`] once the instance is gone.

use tracing::{debug, trace};

use crate::error::EeiError;
use crate::gas::{self, G_BASE, G_CALL, G_STORAGE_LOAD, G_VALUE_TRANSFER};
use crate::gas_meter::GasMeter;
use crate::host::Host;
use crate::memory::{checked_range, WasmMemory};
use crate::traits::Eei;
use crate::types::{
    Address, CallStatus, ExecutionResult, Message, Value, Word, ADDRESS_LEN, MAX_CALL_DEPTH,
    VALUE_LEN, WORD_LEN, ZERO_WORD,
};

pub struct EthereumInterface {
    host: Box<dyn Host>,
    code: Vec<u8>,
    msg: Message,
    gas: GasMeter,
    meter_interface_gas: bool,
    return_data: Vec<u8>,
    output: Vec<u8>,
    is_revert: bool,
}

impl EthereumInterface {
    /// `meter_interface_gas` selects whether host calls are charged the gas
    /// schedule; `useGas` always charges.
    pub fn new(host: Box<dyn Host>, code: Vec<u8>, msg: Message, meter_interface_gas: bool) -> Self {
        let gas = GasMeter::new(msg.gas);
        Self {
            host,
            code,
            msg,
            gas,
            meter_interface_gas,
            return_data: Vec::new(),
            output: Vec::new(),
            is_revert: false,
        }
    }

    pub fn message(&self) -> &Message {
        &self.msg
    }

    fn charge(&mut self, amount: u64) -> Result<(), EeiError> {
        if self.meter_interface_gas {
            self.gas.charge(amount)?;
        }
        Ok(())
    }

    fn charge_copy(&mut self, length: u32) -> Result<(), EeiError> {
        if self.meter_interface_gas {
            self.gas.charge_copy(length as usize)?;
        }
        Ok(())
    }

    fn end(&mut self, memory: &mut dyn WasmMemory, data_offset: u32, length: u32, is_revert: bool) -> Result<(), EeiError> {
        self.output = memory.load(data_offset, length)?;
        self.is_revert = is_revert;
        debug!(len = self.output.len(), is_revert, "contract ended execution");
        Err(EeiError::end_execution())
    }
}

/// Copy `source[source_offset..source_offset + length]` into memory.
fn copy_to_memory(
    memory: &mut dyn WasmMemory,
    source: &[u8],
    result_offset: u32,
    source_offset: u32,
    length: u32,
) -> Result<(), EeiError> {
    let range = checked_range(source.len(), source_offset, length as usize)
        .ok_or_else(|| EeiError::invalid_memory_access("out of bounds (source) memory copy"))?;
    memory.store(result_offset, &source[range])
}

fn load_array<const N: usize>(memory: &dyn WasmMemory, offset: u32) -> Result<[u8; N], EeiError> {
    let bytes = memory.load(offset, N as u32)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn as_i64(gas: u64) -> i64 {
    i64::try_from(gas).unwrap_or(i64::MAX)
}

impl Eei for EthereumInterface {
    fn use_gas(&mut self, amount: i64) -> Result<(), EeiError> {
        let amount = u64::try_from(amount)
            .map_err(|_| EeiError::argument_out_of_range("negative gas supplied"))?;
        trace!(amount, "useGas");
        self.gas.charge(amount)
    }

    fn get_address(&mut self, memory: &mut dyn WasmMemory, result_offset: u32) -> Result<(), EeiError> {
        self.charge(G_BASE)?;
        memory.store(result_offset, &self.msg.destination)
    }

    fn call(
        &mut self,
        memory: &mut dyn WasmMemory,
        gas: i64,
        address_offset: u32,
        value_offset: u32,
        data_offset: u32,
        data_length: u32,
    ) -> Result<u32, EeiError> {
        self.charge(G_CALL)?;

        let destination: Address = load_array::<ADDRESS_LEN>(memory, address_offset)?;
        let value: Value = load_array::<VALUE_LEN>(memory, value_offset)?;
        let input = memory.load(data_offset, data_length)?;

        let nested = Message {
            sender: self.msg.destination,
            destination,
            value,
            input,
            gas: 0,
            depth: self.msg.depth.saturating_add(1),
            is_static: self.msg.is_static,
        };
        if nested.has_value() {
            if self.msg.is_static {
                return Err(EeiError::static_mode_violation("call with value"));
            }
            self.charge(G_VALUE_TRANSFER)?;
        }

        let forwarded = u64::try_from(gas)
            .map_err(|_| EeiError::argument_out_of_range("negative gas supplied"))?;
        if forwarded > self.gas.remaining() {
            return Err(EeiError::out_of_gas());
        }

        self.return_data.clear();
        if self.msg.depth >= MAX_CALL_DEPTH {
            debug!(depth = self.msg.depth, "call depth limit reached");
            return Ok(CallStatus::Failure.as_u32());
        }

        self.gas.charge(forwarded)?;
        let nested = Message { gas: forwarded, ..nested };
        let outcome = self.host.call(&nested)?;
        self.gas.refund(outcome.gas_left.min(forwarded));
        self.return_data = outcome.output;

        debug!(
            depth = nested.depth,
            status = ?outcome.status,
            gas_used = forwarded - outcome.gas_left.min(forwarded),
            "nested call returned"
        );
        Ok(outcome.status.as_u32())
    }

    fn call_data_copy(
        &mut self,
        memory: &mut dyn WasmMemory,
        result_offset: u32,
        data_offset: u32,
        length: u32,
    ) -> Result<(), EeiError> {
        self.charge_copy(length)?;
        copy_to_memory(memory, &self.msg.input, result_offset, data_offset, length)
    }

    fn get_call_data_size(&mut self) -> Result<u32, EeiError> {
        self.charge(G_BASE)?;
        Ok(self.msg.input.len() as u32)
    }

    fn get_gas_left(&mut self) -> Result<i64, EeiError> {
        self.charge(G_BASE)?;
        Ok(as_i64(self.gas.remaining()))
    }

    fn storage_store(
        &mut self,
        memory: &mut dyn WasmMemory,
        path_offset: u32,
        value_offset: u32,
    ) -> Result<(), EeiError> {
        if self.msg.is_static {
            return Err(EeiError::static_mode_violation("storageStore"));
        }
        let key: Word = load_array::<WORD_LEN>(memory, path_offset)?;
        let value: Word = load_array::<WORD_LEN>(memory, value_offset)?;

        let current = self.host.get_storage(&self.msg.destination, &key)?;
        let cost = if current == ZERO_WORD && value != ZERO_WORD {
            gas::G_STORAGE_STORE_CREATE
        } else {
            gas::G_STORAGE_STORE_UPDATE
        };
        self.charge(cost)?;
        self.host.set_storage(&self.msg.destination, &key, &value)
    }

    fn storage_load(
        &mut self,
        memory: &mut dyn WasmMemory,
        path_offset: u32,
        value_offset: u32,
    ) -> Result<(), EeiError> {
        self.charge(G_STORAGE_LOAD)?;
        let key: Word = load_array::<WORD_LEN>(memory, path_offset)?;
        let value = self.host.get_storage(&self.msg.destination, &key)?;
        memory.store(value_offset, &value)
    }

    fn code_copy(
        &mut self,
        memory: &mut dyn WasmMemory,
        result_offset: u32,
        code_offset: u32,
        length: u32,
    ) -> Result<(), EeiError> {
        self.charge_copy(length)?;
        copy_to_memory(memory, &self.code, result_offset, code_offset, length)
    }

    fn get_code_size(&mut self) -> Result<u32, EeiError> {
        self.charge(G_BASE)?;
        Ok(self.code.len() as u32)
    }

    fn finish(&mut self, memory: &mut dyn WasmMemory, data_offset: u32, length: u32) -> Result<(), EeiError> {
        self.end(memory, data_offset, length, false)
    }

    fn revert(&mut self, memory: &mut dyn WasmMemory, data_offset: u32, length: u32) -> Result<(), EeiError> {
        self.end(memory, data_offset, length, true)
    }

    fn get_return_data_size(&mut self) -> Result<u32, EeiError> {
        self.charge(G_BASE)?;
        Ok(self.return_data.len() as u32)
    }

    fn return_data_copy(
        &mut self,
        memory: &mut dyn WasmMemory,
        result_offset: u32,
        data_offset: u32,
        length: u32,
    ) -> Result<(), EeiError> {
        self.charge_copy(length)?;
        copy_to_memory(memory, &self.return_data, result_offset, data_offset, length)
    }

    fn gas_left(&self) -> u64 {
        self.gas.remaining()
    }

    fn into_result(self: Box<Self>) -> ExecutionResult {
        ExecutionResult {
            return_data: self.output,
            gas_used: self.gas.consumed(),
            gas_left: self.gas.remaining(),
            is_revert: self.is_revert,
        }
    }
}
