//! In-memory host for testing.
//!
//! `MemHost` keeps storage and deployed code in `BTreeMap`s for deterministic
//! iteration order. Nested calls go to an optional handler; without one every
//! call fails with all forwarded gas consumed.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::EeiError;
use crate::host::Host;
use crate::types::{Address, CallOutcome, Message, Word, ZERO_WORD, ADDRESS_LEN};

type CallHandler = Box<dyn FnMut(&Message) -> CallOutcome>;

#[derive(Default)]
pub struct MemHost {
    storage: BTreeMap<(Address, Word), Word>,
    code: BTreeMap<Address, Vec<u8>>,
    calls: Vec<Message>,
    handler: Option<CallHandler>,
}

impl MemHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route nested calls to `handler`.
    pub fn with_call_handler(mut self, handler: impl FnMut(&Message) -> CallOutcome + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Store `code` under an address derived from its BLAKE3 hash.
    pub fn deploy(&mut self, code: Vec<u8>) -> Address {
        let hash = blake3::hash(&code);
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&hash.as_bytes()[..ADDRESS_LEN]);
        self.code.insert(address, code);
        address
    }

    pub fn code(&self, address: &Address) -> Option<&[u8]> {
        self.code.get(address).map(Vec::as_slice)
    }

    /// Seed a storage slot.
    pub fn insert(&mut self, address: Address, key: Word, value: Word) {
        self.storage.insert((address, key), value);
    }

    /// Storage slot value, if it has ever been written.
    pub fn storage(&self, address: &Address, key: &Word) -> Option<Word> {
        self.storage.get(&(*address, *key)).copied()
    }

    /// Every nested call dispatched through this host, in order.
    pub fn calls(&self) -> &[Message] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl fmt::Debug for MemHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemHost")
            .field("storage", &self.storage.len())
            .field("code", &self.code.len())
            .field("calls", &self.calls.len())
            .finish()
    }
}

impl Host for MemHost {
    fn get_storage(&self, address: &Address, key: &Word) -> Result<Word, EeiError> {
        Ok(self.storage(address, key).unwrap_or(ZERO_WORD))
    }

    fn set_storage(&mut self, address: &Address, key: &Word, value: &Word) -> Result<(), EeiError> {
        self.storage.insert((*address, *key), *value);
        Ok(())
    }

    fn call(&mut self, msg: &Message) -> Result<CallOutcome, EeiError> {
        self.calls.push(msg.clone());
        let outcome = match self.handler.as_mut() {
            Some(handler) => handler(msg),
            None => CallOutcome::failure(),
        };
        debug!(depth = msg.depth, status = ?outcome.status, "nested call dispatched");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CallStatus;

    #[test]
    fn test_empty_host() {
        let host = MemHost::new();
        assert!(host.is_empty());
        assert_eq!(host.get_storage(&[1u8; 20], &[2u8; 32]).unwrap(), ZERO_WORD);
    }

    #[test]
    fn test_set_and_get_storage() {
        let mut host = MemHost::new();
        host.set_storage(&[1u8; 20], &[2u8; 32], &[3u8; 32]).unwrap();
        assert_eq!(host.get_storage(&[1u8; 20], &[2u8; 32]).unwrap(), [3u8; 32]);
        // storage is scoped per address
        assert_eq!(host.get_storage(&[9u8; 20], &[2u8; 32]).unwrap(), ZERO_WORD);
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_deploy_is_content_addressed() {
        let mut host = MemHost::new();
        let a = host.deploy(b"code-a".to_vec());
        let b = host.deploy(b"code-b".to_vec());
        assert_ne!(a, b);
        assert_eq!(host.deploy(b"code-a".to_vec()), a);
        assert_eq!(host.code(&a), Some(&b"code-a"[..]));
        assert_eq!(host.code(&[0u8; 20]), None);
    }

    #[test]
    fn test_call_without_handler_fails() {
        let mut host = MemHost::new();
        let msg = Message::new([1u8; 20], [2u8; 20], vec![], 100);
        let outcome = host.call(&msg).unwrap();
        assert_eq!(outcome.status, CallStatus::Failure);
        assert_eq!(host.calls().len(), 1);
    }

    #[test]
    fn test_call_handler() {
        let mut host = MemHost::new().with_call_handler(|msg| CallOutcome {
            status: CallStatus::Success,
            output: msg.input.clone(),
            gas_left: msg.gas / 2,
        });
        let msg = Message::new([1u8; 20], [2u8; 20], vec![7, 8], 100);
        let outcome = host.call(&msg).unwrap();
        assert_eq!(outcome.status, CallStatus::Success);
        assert_eq!(outcome.output, vec![7, 8]);
        assert_eq!(outcome.gas_left, 50);
    }
}
