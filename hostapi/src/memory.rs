//! Linear memory as seen by the environment interface.
//!
//! The sandbox hands every EEI operation a [`WasmMemory`] view of the running
//! module's memory. Byte-level `get`/`set` are the primitive contract; the bulk
//! `load`/`store` helpers default to them and may be overridden.

use std::ops::Range;

use crate::error::EeiError;

/// WebAssembly page size in bytes.
pub const PAGE_SIZE: usize = 65536;

/// Bounds-checked access to a module's linear memory.
pub trait WasmMemory {
    /// Current memory size in bytes (always a multiple of [`PAGE_SIZE`]).
    ///
    /// Fails with `InvalidMemoryAccess` once the handle has been released.
    fn size(&self) -> Result<usize, EeiError>;

    fn get(&self, offset: usize) -> Result<u8, EeiError>;

    fn set(&mut self, offset: usize, value: u8) -> Result<(), EeiError>;

    /// Read `len` bytes starting at `offset`.
    fn load(&self, offset: u32, len: u32) -> Result<Vec<u8>, EeiError> {
        let range = checked_range(self.size()?, offset, len as usize)
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory read"))?;
        range.map(|i| self.get(i)).collect()
    }

    /// Write `bytes` starting at `offset`.
    fn store(&mut self, offset: u32, bytes: &[u8]) -> Result<(), EeiError> {
        let range = checked_range(self.size()?, offset, bytes.len())
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory write"))?;
        for (i, byte) in range.zip(bytes) {
            self.set(i, *byte)?;
        }
        Ok(())
    }
}

/// `[offset, offset + len)` if it lies within `limit` bytes.
pub fn checked_range(limit: usize, offset: u32, len: usize) -> Option<Range<usize>> {
    let start = offset as usize;
    let end = start.checked_add(len)?;
    if end > limit {
        return None;
    }
    Some(start..end)
}

/// Heap-backed linear memory for exercising EEI implementations without an
/// engine.
#[derive(Debug, Clone, Default)]
pub struct VecMemory {
    data: Vec<u8>,
}

impl VecMemory {
    pub fn with_pages(pages: usize) -> Self {
        Self {
            data: vec![0u8; pages * PAGE_SIZE],
        }
    }
}

impl WasmMemory for VecMemory {
    fn size(&self) -> Result<usize, EeiError> {
        Ok(self.data.len())
    }

    fn get(&self, offset: usize) -> Result<u8, EeiError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory read"))
    }

    fn set(&mut self, offset: usize, value: u8) -> Result<(), EeiError> {
        let slot = self
            .data
            .get_mut(offset)
            .ok_or_else(|| EeiError::invalid_memory_access("out of bounds memory write"))?;
        *slot = value;
        Ok(())
    }
}
