//! `ewasm-sandbox`: Wasmtime-based execution bridge for ewasm contracts.
//!
//! This crate runs a contract's WebAssembly inside a fresh Wasmtime store per
//! invocation and connects its `ethereum` imports to an `Eei` implementation
//! from `ewasm-hostapi`. It provides:
//!
//! - **Host function table:** the 14 `ethereum` imports and their signatures
//! - **Import resolution:** every import checked before instantiation
//! - **Exception bridge:** interface failures parked, trapped and re-raised
//! - **Context stack:** per-thread nesting ledger for reentrant calls
//! - **Memory bridge:** bounds-checked access to the contract's memory
//! - **Determinism:** no SIMD, no threads, NaN canonicalization
//!
//! The primary entry point is [`Sandbox::execute`].

pub mod error;
pub mod config;
pub mod host_table;
pub mod memory;
pub mod exception;
pub mod context_stack;
pub mod host_impl;
pub mod validation;
pub mod resolver;
pub mod linker;
pub mod runtime;

pub use error::SandboxError;
pub use config::SandboxConfig;
pub use host_table::{HostFunctionTable, HOST_MODULE};
pub use runtime::Sandbox;
