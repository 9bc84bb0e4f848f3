//! The `ethereum` host function table.
//!
//! Every function a contract may import, with its WebAssembly signature. The
//! resolver checks contract imports against this table, and the linker
//! registers exactly these functions.

use std::fmt;

use wasmtime::{FuncType, ValType};

/// Module name contracts import host functions from.
pub const HOST_MODULE: &str = "ethereum";

/// The two value types the host ABI uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiType {
    I32,
    I64,
}

impl AbiType {
    /// Maps an engine value type onto the ABI, `None` for anything else.
    pub fn from_val_type(ty: &ValType) -> Option<Self> {
        match ty {
            ValType::I32 => Some(Self::I32),
            ValType::I64 => Some(Self::I64),
            _ => None,
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
        }
    }
}

/// One host function: export name and signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFunction {
    pub name: &'static str,
    pub params: &'static [AbiType],
    pub results: &'static [AbiType],
}

impl HostFunction {
    /// Whether an imported function type matches this entry exactly.
    pub fn matches(&self, ty: &FuncType) -> bool {
        signature_matches(self.params, ty.params()) && signature_matches(self.results, ty.results())
    }
}

fn signature_matches(expected: &[AbiType], actual: impl ExactSizeIterator<Item = ValType>) -> bool {
    actual.len() == expected.len()
        && actual
            .zip(expected)
            .all(|(ty, abi)| AbiType::from_val_type(&ty) == Some(*abi))
}

fn write_types(f: &mut fmt::Formatter<'_>, types: &[AbiType]) -> fmt::Result {
    f.write_str("(")?;
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    f.write_str(")")
}

impl fmt::Display for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        write_types(f, self.params)?;
        f.write_str(" -> ")?;
        write_types(f, self.results)
    }
}

use AbiType::{I32, I64};

const ETHEREUM_FUNCTIONS: &[HostFunction] = &[
    HostFunction { name: "useGas", params: &[I64], results: &[] },
    HostFunction { name: "getAddress", params: &[I32], results: &[] },
    HostFunction { name: "call", params: &[I64, I32, I32, I32, I32], results: &[I32] },
    HostFunction { name: "callDataCopy", params: &[I32, I32, I32], results: &[] },
    HostFunction { name: "getCallDataSize", params: &[], results: &[I32] },
    HostFunction { name: "getGasLeft", params: &[], results: &[I64] },
    HostFunction { name: "storageStore", params: &[I32, I32], results: &[] },
    HostFunction { name: "storageLoad", params: &[I32, I32], results: &[] },
    HostFunction { name: "codeCopy", params: &[I32, I32, I32], results: &[] },
    HostFunction { name: "getCodeSize", params: &[], results: &[I32] },
    HostFunction { name: "finish", params: &[I32, I32], results: &[] },
    HostFunction { name: "revert", params: &[I32, I32], results: &[] },
    HostFunction { name: "getReturnDataSize", params: &[], results: &[I32] },
    HostFunction { name: "returnDataCopy", params: &[I32, I32, I32], results: &[] },
];

/// A named host module and the functions it exports.
#[derive(Debug, Clone)]
pub struct HostFunctionTable {
    module: &'static str,
    functions: &'static [HostFunction],
}

impl HostFunctionTable {
    /// The `ethereum` host module.
    pub fn ethereum() -> Self {
        Self {
            module: HOST_MODULE,
            functions: ETHEREUM_FUNCTIONS,
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn get(&self, name: &str) -> Option<&'static HostFunction> {
        let functions: &'static [HostFunction] = self.functions;
        functions.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'static, HostFunction> {
        let functions: &'static [HostFunction] = self.functions;
        functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
