//! Contract module validation: required exports.
//!
//! A contract must export:
//!
//! 1. `memory`, a linear memory whose initial size fits the configured limit
//! 2. `main`, a function taking and returning nothing
//!
//! Imports are checked separately by the resolver.

use wasmtime::{ExternType, Module};

use crate::config::SandboxConfig;
use crate::error::SandboxError;

/// Name of the exported linear memory.
pub const MEMORY_EXPORT: &str = "memory";

/// Name of the exported entry point.
pub const MAIN_EXPORT: &str = "main";

/// Validate that a contract module exposes the entry points the sandbox drives.
pub fn validate_module(module: &Module, config: &SandboxConfig) -> Result<(), SandboxError> {
    validate_memory(module, config)?;
    validate_main(module)?;
    Ok(())
}

fn validate_memory(module: &Module, config: &SandboxConfig) -> Result<(), SandboxError> {
    let export = module
        .get_export(MEMORY_EXPORT)
        .ok_or_else(|| SandboxError::ValidationError("\"memory\" not found".into()))?;

    let memory_ty = match export {
        ExternType::Memory(mt) => mt,
        _ => {
            return Err(SandboxError::ValidationError(
                "export 'memory' must be a linear memory".into(),
            ));
        }
    };

    if memory_ty.minimum() > u64::from(config.max_memory_pages) {
        return Err(SandboxError::ValidationError(format!(
            "initial memory of {} pages exceeds the limit of {} pages",
            memory_ty.minimum(),
            config.max_memory_pages
        )));
    }
    Ok(())
}

fn validate_main(module: &Module) -> Result<(), SandboxError> {
    let export = module
        .get_export(MAIN_EXPORT)
        .ok_or_else(|| SandboxError::ValidationError("\"main\" not found".into()))?;

    let func_ty = match export {
        ExternType::Func(ft) => ft,
        _ => {
            return Err(SandboxError::ValidationError(
                "export 'main' must be a function".into(),
            ));
        }
    };

    if func_ty.params().len() != 0 || func_ty.results().len() != 0 {
        return Err(SandboxError::ValidationError(format!(
            "export 'main' has wrong signature: expected () -> (), got {} params and {} results",
            func_ty.params().len(),
            func_ty.results().len()
        )));
    }
    Ok(())
}
