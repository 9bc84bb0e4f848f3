//! Shared test helpers for integration tests.
//!
//! Provides a WAT contract builder (assembled to binary before execution) that imports the whole `ethereum` module,
//! message helpers, and a `World` host that deploys contracts and runs nested
//! calls through the sandbox.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use ewasm_hostapi::{
    Address, CallOutcome, CallStatus, EeiError, ExecutionResult, Host, MemHost, Message, Word,
};
use ewasm_sandbox::{context_stack, Sandbox, SandboxConfig, SandboxError};

/// Sender of every top-level message.
pub const CALLER: Address = [0xCA; 20];

/// Destination of top-level messages that do not go through a `World`.
pub const CONTRACT: Address = [0xC0; 20];

pub const DEFAULT_GAS: u64 = 1_000_000;

// ── Contract Builder ──

const IMPORTS: &str = r#"
    (import "ethereum" "useGas" (func $useGas (param i64)))
    (import "ethereum" "getAddress" (func $getAddress (param i32)))
    (import "ethereum" "call" (func $call (param i64 i32 i32 i32 i32) (result i32)))
    (import "ethereum" "callDataCopy" (func $callDataCopy (param i32 i32 i32)))
    (import "ethereum" "getCallDataSize" (func $getCallDataSize (result i32)))
    (import "ethereum" "getGasLeft" (func $getGasLeft (result i64)))
    (import "ethereum" "storageStore" (func $storageStore (param i32 i32)))
    (import "ethereum" "storageLoad" (func $storageLoad (param i32 i32)))
    (import "ethereum" "codeCopy" (func $codeCopy (param i32 i32 i32)))
    (import "ethereum" "getCodeSize" (func $getCodeSize (result i32)))
    (import "ethereum" "finish" (func $finish (param i32 i32)))
    (import "ethereum" "revert" (func $revert (param i32 i32)))
    (import "ethereum" "getReturnDataSize" (func $getReturnDataSize (result i32)))
    (import "ethereum" "returnDataCopy" (func $returnDataCopy (param i32 i32 i32)))
"#;

/// A contract with `pages` of exported memory whose `main` runs `body`.
pub fn contract(pages: u32, body: &str) -> String {
    contract_with(pages, "", body)
}

/// Like [`contract`], with extra module fields (data segments, helper
/// functions) spliced in before `main`.
pub fn contract_with(pages: u32, fields: &str, body: &str) -> String {
    format!(
        "(module {imports}\n  (memory (export \"memory\") {pages})\n  {fields}\n  (func (export \"main\")\n    {body}))",
        imports = IMPORTS,
        pages = pages,
        fields = fields,
        body = body,
    )
}

/// Assemble WAT text into the binary format the sandbox accepts.
pub fn assemble(wat: &str) -> Vec<u8> {
    wat::parse_str(wat).unwrap_or_else(|e| panic!("invalid test contract: {}", e))
}

/// A data segment placing `bytes` at `offset`.
pub fn data_segment(offset: u32, bytes: &[u8]) -> String {
    let escaped: String = bytes.iter().map(|b| format!("\\{:02x}", b)).collect();
    format!("(data (i32.const {}) \"{}\")", offset, escaped)
}

// ── Messages and Sandboxes ──

pub fn message(input: Vec<u8>, gas: u64) -> Message {
    Message::new(CALLER, CONTRACT, input, gas)
}

pub fn sandbox() -> Sandbox {
    Sandbox::new(SandboxConfig::default()).unwrap()
}

pub fn sandbox_with(config: SandboxConfig) -> Sandbox {
    Sandbox::new(config).unwrap()
}

/// Run `wat` once against an empty `MemHost`.
pub fn run(wat: &str) -> Result<ExecutionResult, SandboxError> {
    run_with(&sandbox(), wat, Vec::new())
}

pub fn run_with(
    sandbox: &Sandbox,
    wat: &str,
    input: Vec<u8>,
) -> Result<ExecutionResult, SandboxError> {
    let result = sandbox.execute(&assemble(wat), message(input, DEFAULT_GAS), Box::new(MemHost::new()));
    assert_eq!(context_stack::depth(), 0, "context stack left unbalanced");
    result
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn from_hex(hex: &str) -> Vec<u8> {
    assert!(hex.len() % 2 == 0, "odd-length hex string");
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .unwrap_or_else(|_| panic!("invalid hex at position {}", i))
        })
        .collect()
}

// ── World ──

/// Shared state plus a sandbox: nested calls execute deployed contracts.
///
/// Cloning shares the same state, so every nesting level sees one world.
#[derive(Clone)]
pub struct World {
    state: Rc<RefCell<MemHost>>,
    sandbox: Rc<Sandbox>,
    /// Context stack depth observed at each nested call dispatch.
    dispatch_depths: Rc<RefCell<Vec<usize>>>,
    calls: Rc<RefCell<Vec<Message>>>,
}

impl World {
    pub fn new(sandbox: Sandbox) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemHost::new())),
            sandbox: Rc::new(sandbox),
            dispatch_depths: Rc::new(RefCell::new(Vec::new())),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn deploy(&self, wat: &str) -> Address {
        self.state.borrow_mut().deploy(assemble(wat))
    }

    /// Execute the contract at `address` as a top-level call.
    pub fn execute(
        &self,
        address: Address,
        input: Vec<u8>,
        gas: u64,
    ) -> Result<ExecutionResult, SandboxError> {
        self.execute_message(Message::new(CALLER, address, input, gas))
    }

    pub fn execute_message(&self, msg: Message) -> Result<ExecutionResult, SandboxError> {
        let code = self
            .state
            .borrow()
            .code(&msg.destination)
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        let result = self.sandbox.execute(&code, msg, Box::new(self.clone()));
        assert_eq!(context_stack::depth(), 0, "context stack left unbalanced");
        result
    }

    pub fn storage(&self, address: &Address, key: &Word) -> Option<Word> {
        self.state.borrow().storage(address, key)
    }

    pub fn calls(&self) -> Vec<Message> {
        self.calls.borrow().clone()
    }

    pub fn dispatch_depths(&self) -> Vec<usize> {
        self.dispatch_depths.borrow().clone()
    }
}

impl Host for World {
    fn get_storage(&self, address: &Address, key: &Word) -> Result<Word, EeiError> {
        self.state.borrow().get_storage(address, key)
    }

    fn set_storage(&mut self, address: &Address, key: &Word, value: &Word) -> Result<(), EeiError> {
        self.state.borrow_mut().set_storage(address, key, value)
    }

    fn call(&mut self, msg: &Message) -> Result<CallOutcome, EeiError> {
        self.calls.borrow_mut().push(msg.clone());
        self.dispatch_depths.borrow_mut().push(context_stack::depth());

        let code = self.state.borrow().code(&msg.destination).map(<[u8]>::to_vec);
        let code = match code {
            Some(code) => code,
            None => return Ok(CallOutcome::failure()),
        };

        match self.sandbox.execute(&code, msg.clone(), Box::new(self.clone())) {
            Ok(result) => Ok(CallOutcome {
                status: if result.is_revert {
                    CallStatus::Revert
                } else {
                    CallStatus::Success
                },
                output: result.return_data,
                gas_left: result.gas_left,
            }),
            Err(_) => Ok(CallOutcome::failure()),
        }
    }
}
