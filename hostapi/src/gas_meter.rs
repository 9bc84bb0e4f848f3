//! Per-invocation gas meter.
//!
//! The meter is the source of truth for gas accounting within one contract
//! invocation. Charges are checked before they are applied, so a failed charge
//! leaves the meter untouched.

use crate::error::EeiError;
use crate::gas::copy_cost;

#[derive(Debug, Clone)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// Charge gas. Returns `Err(OutOfGas)` if the limit would be exceeded.
    pub fn charge(&mut self, amount: u64) -> Result<(), EeiError> {
        let new_consumed = match self.consumed.checked_add(amount) {
            Some(v) if v <= self.limit => v,
            _ => return Err(EeiError::out_of_gas()),
        };
        self.consumed = new_consumed;
        Ok(())
    }

    /// Charge the copy cost for `len` bytes.
    pub fn charge_copy(&mut self, len: usize) -> Result<(), EeiError> {
        self.charge(copy_cost(len))
    }

    /// Return unused gas forwarded to a nested call.
    ///
    /// Never refunds more than was consumed.
    pub fn refund(&mut self, amount: u64) {
        self.consumed = self.consumed.saturating_sub(amount);
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }
}
