//! Import resolution against the registered host modules.
//!
//! Every import of a contract must name a registered host module, a function
//! that module exports, and that function's exact signature. Resolution is a
//! lookup: it never instantiates anything and reports the first failure as a
//! validation error.

use std::collections::BTreeMap;

use tracing::debug;
use wasmtime::{ExternType, Module};

use crate::error::SandboxError;
use crate::host_table::{HostFunction, HostFunctionTable};

/// Host modules available to contracts, keyed by module name.
#[derive(Debug, Clone, Default)]
pub struct HostModules {
    modules: BTreeMap<&'static str, HostFunctionTable>,
}

impl HostModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry every contract links against: just `ethereum`.
    pub fn ethereum() -> Self {
        let mut modules = Self::new();
        modules.register(HostFunctionTable::ethereum());
        modules
    }

    pub fn register(&mut self, table: HostFunctionTable) {
        self.modules.insert(table.module(), table);
    }

    pub fn get(&self, module: &str) -> Option<&HostFunctionTable> {
        self.modules.get(module)
    }
}

/// An import bound to the host function that will serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    pub module: String,
    pub name: String,
    pub function: &'static HostFunction,
}

/// Resolve every import of `module`.
pub fn resolve_imports(
    module: &Module,
    hosts: &HostModules,
) -> Result<Vec<ResolvedImport>, SandboxError> {
    let mut resolved = Vec::new();
    for import in module.imports() {
        let (module_name, name) = (import.module(), import.name());
        let table = hosts.get(module_name).ok_or_else(|| {
            SandboxError::ValidationError(format!("import module '{}' not found", module_name))
        })?;
        let function = table.get(name).ok_or_else(|| {
            SandboxError::ValidationError(format!(
                "import '{}::{}' not found in host module",
                module_name, name
            ))
        })?;
        let func_ty = match import.ty() {
            ExternType::Func(ft) => ft,
            other => {
                return Err(SandboxError::ValidationError(format!(
                    "import '{}::{}' must be a function, found {:?}",
                    module_name, name, other
                )));
            }
        };
        if !function.matches(&func_ty) {
            return Err(SandboxError::ValidationError(format!(
                "import '{}::{}' has the wrong signature, expected {}",
                module_name, name, function
            )));
        }
        resolved.push(ResolvedImport {
            module: module_name.to_string(),
            name: name.to_string(),
            function,
        });
    }
    debug!(imports = resolved.len(), "imports resolved");
    Ok(resolved)
}
