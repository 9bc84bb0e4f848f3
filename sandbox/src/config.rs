//! Sandbox configuration.

use ewasm_hostapi::PAGE_SIZE;

/// Native stack kept free for host frames between two nested invocations:
/// the lifecycle itself, the host function trampolines and the `Host`
/// dispatching the nested call.
pub const HOST_STACK_RESERVE: usize = 256 * 1024;

/// Configuration for the contract sandbox.
///
/// Controls memory limits, optional instruction fuel, interface gas metering
/// and nesting depth.
///
/// Nested invocations run on the caller's thread, so each level can take up
/// to `max_wasm_stack + HOST_STACK_RESERVE` bytes of native stack. An
/// invocation that would start with less than that remaining is refused with
/// `CallDepthExceeded`, whatever `max_call_depth` allows. On an 8 MiB thread
/// that is at least 16 levels.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Maximum linear memory pages (1 page = 64 KiB).
    /// Default: 256 pages = 16 MiB.
    pub max_memory_pages: u32,

    /// Wasmtime fuel limit (instruction metering).
    /// `None` leaves termination to gas metering inside the interface.
    pub fuel_limit: Option<u64>,

    /// Whether host calls are charged the interface gas schedule.
    pub meter_interface_gas: bool,

    /// Maximum number of invocations nested on one thread.
    pub max_call_depth: usize,

    /// Native stack in bytes that guest frames of one invocation may use
    /// before trapping with a stack overflow.
    /// Default: 256 KiB.
    pub max_wasm_stack: usize,
}

impl SandboxConfig {
    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_pages as usize * PAGE_SIZE
    }

    /// Native stack an invocation needs free before it starts.
    pub fn native_stack_per_invocation(&self) -> usize {
        self.max_wasm_stack.saturating_add(HOST_STACK_RESERVE)
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_memory_pages: 256, // 16 MiB
            fuel_limit: None,
            meter_interface_gas: true,
            max_call_depth: 1024,
            max_wasm_stack: 256 * 1024,
        }
    }
}
