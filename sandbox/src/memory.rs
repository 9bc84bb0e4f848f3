//! Memory bridge between the engine's linear memory and the interface.
//!
//! Host functions see the running module's memory through a [`MemoryBridge`].
//! A bridge is either bound to the memory's bytes for the duration of one host
//! call, or released. A released bridge refuses every access, which is how the
//! interface observes teardown.

use ewasm_hostapi::memory::checked_range;
use ewasm_hostapi::{EeiError, WasmMemory};

/// `WasmMemory` view over the bytes of a wasmtime `Memory`.
#[derive(Debug)]
pub struct MemoryBridge<'a> {
    data: Option<&'a mut [u8]>,
}

impl<'a> MemoryBridge<'a> {
    pub fn bound(data: &'a mut [u8]) -> Self {
        Self { data: Some(data) }
    }

    pub fn released() -> Self {
        Self { data: None }
    }

    fn bytes(&self) -> Result<&[u8], EeiError> {
        self.data.as_deref().ok_or_else(released)
    }

    fn bytes_mut(&mut self) -> Result<&mut [u8], EeiError> {
        self.data.as_deref_mut().ok_or_else(released)
    }
}

fn released() -> EeiError {
    EeiError::invalid_memory_access("linear memory handle has been released")
}

impl WasmMemory for MemoryBridge<'_> {
    fn size(&self) -> Result<usize, EeiError> {
        Ok(self.bytes()?.len())
    }

    fn get(&self, offset: usize) -> Result<u8, EeiError> {
        self.bytes()?
            .get(offset)
            .copied()
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory read"))
    }

    fn set(&mut self, offset: usize, value: u8) -> Result<(), EeiError> {
        let slot = self
            .bytes_mut()?
            .get_mut(offset)
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory write"))?;
        *slot = value;
        Ok(())
    }

    fn load(&self, offset: u32, len: u32) -> Result<Vec<u8>, EeiError> {
        let bytes = self.bytes()?;
        let range = checked_range(bytes.len(), offset, len as usize)
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory read"))?;
        Ok(bytes[range].to_vec())
    }

    fn store(&mut self, offset: u32, src: &[u8]) -> Result<(), EeiError> {
        let bytes = self.bytes_mut()?;
        let range = checked_range(bytes.len(), offset, src.len())
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory write"))?;
        bytes[range].copy_from_slice(src);
        Ok(())
    }
}
