//! Sandbox runtime: Wasmtime engine, contract loading and the invocation
//! lifecycle.
//!
//! The `Sandbox` struct is the main entry point. It owns the engine and a
//! linker with the `ethereum` host functions registered once, and drives each
//! contract invocation through a fixed sequence of stages:
//!
//! 1. Deserialize the binary module and validate it
//! 2. Create a fresh store and push a frame on the context stack
//! 3. Resolve imports against the host modules and bind each one to its
//!    registered host function
//! 4. Instantiate the contract
//! 5. Bind the exported memory and look up `main`
//! 6. Invoke `main`
//! 7. Tear down: release memory, pop the frame, drop the store
//! 8. Re-raise any pending exception, otherwise report the result
//!
//! Teardown runs on every path out of stages 2–6.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};
use wasmtime::{Config, Engine, Extern, Instance, Linker, Module, Store, StoreLimitsBuilder, Trap};

use ewasm_hostapi::{EeiError, Eei, EthereumInterface, ExecutionResult, Host, Message};

use crate::config::SandboxConfig;
use crate::context_stack::{self, FrameGuard};
use crate::error::SandboxError;
use crate::exception::{classify, Completion};
use crate::host_impl::HostContext;
use crate::linker::register_host_functions;
use crate::resolver::{resolve_imports, HostModules};
use crate::validation::{validate_module, MAIN_EXPORT, MEMORY_EXPORT};

/// The contract execution sandbox.
///
/// One `Sandbox` serves any number of invocations, including invocations
/// nested inside a host call of another invocation on the same thread. Each
/// invocation gets a fresh Wasmtime store, so nothing leaks between calls.
/// Nesting is bounded by `max_call_depth` and by the native stack left on
/// the thread (see [`SandboxConfig`]).
pub struct Sandbox {
    engine: Engine,
    linker: Linker<HostContext>,
    hosts: HostModules,
    config: SandboxConfig,
}

impl Sandbox {
    /// Create a sandbox with the `ethereum` host module registered.
    pub fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        let engine = create_engine(&config)?;
        let mut linker = Linker::new(&engine);
        register_host_functions(&mut linker)?;
        Ok(Self {
            engine,
            linker,
            hosts: HostModules::ethereum(),
            config,
        })
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Execute `code`, a binary wasm module, for `message`, with storage and
    /// nested calls served by `host`.
    pub fn execute(
        &self,
        code: &[u8],
        message: Message,
        host: Box<dyn Host>,
    ) -> Result<ExecutionResult, SandboxError> {
        let interface = EthereumInterface::new(
            host,
            code.to_vec(),
            message,
            self.config.meter_interface_gas,
        );
        self.execute_with(code, Box::new(interface))
    }

    /// Execute `code` against a caller-supplied interface.
    pub fn execute_with(
        &self,
        code: &[u8],
        interface: Box<dyn Eei>,
    ) -> Result<ExecutionResult, SandboxError> {
        let depth = context_stack::depth();
        if depth >= self.config.max_call_depth {
            warn!(depth, "refusing invocation beyond the call depth limit");
            return Err(SandboxError::CallDepthExceeded { depth });
        }
        if let Some(remaining) = stacker::remaining_stack() {
            let required = self.config.native_stack_per_invocation();
            if remaining < required {
                warn!(depth, remaining, required, "refusing invocation, native stack exhausted");
                return Err(SandboxError::CallDepthExceeded { depth });
            }
        }

        // 1. Deserialize and validate
        let module = self
            .load(code)
            .inspect_err(|e| debug!(stage = "deserialize", error = %e, "contract rejected"))?;

        // 2. Fresh store, frame pushed
        let limits = StoreLimitsBuilder::new()
            .memory_size(self.config.max_memory_bytes())
            .build();
        let gas_limit = interface.gas_left();
        let mut store = Store::new(&self.engine, HostContext::new(interface, limits));
        store.limiter(|context| &mut context.limits);
        let frame = context_stack::push(gas_limit);
        debug!(depth = frame.depth(), gas_limit, "invocation started");

        // 3–6
        let outcome = self.run(&mut store, &module);

        // 7–8
        let context = teardown(store, frame);
        conclude(context, outcome)
    }

    fn load(&self, code: &[u8]) -> Result<Module, SandboxError> {
        let parsed =
            panic::catch_unwind(AssertUnwindSafe(|| Module::from_binary(&self.engine, code)))
                .map_err(|_| SandboxError::ValidationError("contract parser aborted".into()))?;
        let module = parsed.map_err(|e| {
            SandboxError::ValidationError(format!("failed to deserialise contract: {:#}", e))
        })?;
        validate_module(&module, &self.config)?;
        Ok(module)
    }

    fn run(
        &self,
        store: &mut Store<HostContext>,
        module: &Module,
    ) -> Result<Completion, SandboxError> {
        if let Some(fuel) = self.config.fuel_limit {
            store.set_fuel(fuel)?;
        }

        let resolved = resolve_imports(module, &self.hosts)
            .inspect_err(|e| debug!(stage = "link", error = %e, "contract rejected"))?;
        let imports = resolved
            .iter()
            .map(|import| {
                self.linker
                    .get(&mut *store, &import.module, &import.name)
                    .ok_or_else(|| {
                        SandboxError::Internal(format!(
                            "host function '{}::{}' is not registered",
                            import.module, import.function.name
                        ))
                    })
            })
            .collect::<Result<Vec<Extern>, _>>()?;

        let instance = match Instance::new(&mut *store, module, &imports) {
            Ok(instance) => instance,
            Err(e) => {
                debug!(stage = "instantiate", error = %e, "instantiation failed");
                return instantiation_failure(e);
            }
        };

        let memory = instance
            .get_memory(&mut *store, MEMORY_EXPORT)
            .ok_or_else(|| SandboxError::ValidationError("\"memory\" not found".into()))?;
        store.data_mut().bind_memory(memory);

        let main = instance
            .get_typed_func::<(), ()>(&mut *store, MAIN_EXPORT)
            .map_err(|_| SandboxError::ValidationError("entry point not found".into()))?;

        let completion = classify(main.call(&mut *store, ()));
        debug!(?completion, "invocation finished");
        Ok(completion)
    }
}

/// A start function that traps or ends execution is treated like `main`
/// doing so. Anything else means a validated, linked contract failed to
/// instantiate.
fn instantiation_failure(err: wasmtime::Error) -> Result<Completion, SandboxError> {
    if err.downcast_ref::<Trap>().is_some() || err.downcast_ref::<EeiError>().is_some() {
        return Ok(classify(Err(err)));
    }
    Err(SandboxError::Internal(format!(
        "failed to instantiate contract: {:#}",
        err
    )))
}

/// Release the memory handle, pop the frame and drop the store.
fn teardown(mut store: Store<HostContext>, frame: FrameGuard) -> HostContext {
    store.data_mut().release_memory();
    drop(frame);
    store.into_data()
}

fn conclude(
    mut context: HostContext,
    outcome: Result<Completion, SandboxError>,
) -> Result<ExecutionResult, SandboxError> {
    if let Some(err) = context.pending.take() {
        debug!(kind = %err.kind(), "re-raising pending exception");
        return Err(SandboxError::Eei(err));
    }
    match outcome? {
        Completion::Returned | Completion::Ended => Ok(context.interface.into_result()),
        Completion::Trapped(message) => {
            warn!(%message, "contract trapped");
            Err(SandboxError::GuestTrapped(message))
        }
    }
}

/// Create a Wasmtime engine with deterministic configuration.
fn create_engine(config: &SandboxConfig) -> Result<Engine, SandboxError> {
    let mut wasm_config = Config::new();

    // Optional instruction metering
    wasm_config.consume_fuel(config.fuel_limit.is_some());

    // Determinism enforcement
    wasm_config.wasm_threads(false);
    wasm_config.wasm_simd(false);
    wasm_config.wasm_relaxed_simd(false);
    wasm_config.wasm_multi_memory(false);
    wasm_config.cranelift_nan_canonicalization(true);

    // Native stack available to guest frames of one invocation
    wasm_config.max_wasm_stack(config.max_wasm_stack);

    // Memory limits
    let max_bytes = config.max_memory_bytes() as u64;
    wasm_config.memory_guaranteed_dense_image_size(max_bytes.min(16 * 1024 * 1024));

    Ok(Engine::new(&wasm_config)?)
}
