//! Gas accounting tests: interface charges, forwarded call gas and refunds.

mod common;

use ewasm_hostapi::gas::{copy_cost, G_BASE, G_CALL, G_VALUE_TRANSFER};
use ewasm_hostapi::ErrorKind;
use ewasm_sandbox::SandboxConfig;

use common::*;

/// Calls `[0x99; 20]` (an empty account) with `gas` and `value_byte` in the
/// lowest byte of the value.
fn call_empty_account(gas: i64, value_byte: u8) -> String {
    contract_with(
        1,
        &format!("{}\n{}", data_segment(0, &[0x99; 20]), data_segment(32, &[value_byte])),
        &format!(
            "(drop (call $call (i64.const {}) (i32.const 0) (i32.const 32) (i32.const 0) (i32.const 0)))",
            gas
        ),
    )
}

// ── Test: use_gas ──

#[test]
fn test_use_gas_is_charged_exactly() {
    let result = run(&contract(0, "(call $useGas (i64.const 1234))")).unwrap();
    assert_eq!(result.gas_used, 1234);
    assert_eq!(result.gas_left, DEFAULT_GAS - 1234);
}

#[test]
fn test_use_gas_up_to_the_limit() {
    let result = run(&contract(0, "(call $useGas (i64.const 1000000))")).unwrap();
    assert_eq!(result.gas_left, 0);
}

// ── Test: copy costs ──

#[test]
fn test_call_data_copy_cost_per_word() {
    let wat = contract(1, "(call $callDataCopy (i32.const 0) (i32.const 0) (i32.const 33))");
    let result = run_with(&sandbox(), &wat, vec![7; 33]).unwrap();
    assert_eq!(result.gas_used, copy_cost(33));
    assert_eq!(copy_cost(33), 9);
}

#[test]
fn test_informational_calls_cost_base() {
    let wat = contract(
        1,
        "(drop (call $getCallDataSize))
         (drop (call $getCodeSize))
         (drop (call $getReturnDataSize))
         (drop (call $getGasLeft))",
    );
    let result = run(&wat).unwrap();
    assert_eq!(result.gas_used, 4 * G_BASE);
}

// ── Test: nested call gas ──

#[test]
fn test_failed_call_consumes_forwarded_gas() {
    let result = run(&call_empty_account(5_000, 0)).unwrap();
    assert_eq!(result.gas_used, G_CALL + 5_000);
}

#[test]
fn test_value_transfer_surcharge() {
    let result = run(&call_empty_account(5_000, 1)).unwrap();
    assert_eq!(result.gas_used, G_CALL + G_VALUE_TRANSFER + 5_000);
}

#[test]
fn test_reverted_call_refunds_unused_gas() {
    let world = World::new(sandbox());
    let callee = world.deploy(&contract(0, "(call $revert (i32.const 0) (i32.const 0))"));
    let caller = world.deploy(&contract_with(
        1,
        &data_segment(0, &callee),
        "(drop (call $call (i64.const 5000) (i32.const 0) (i32.const 32) (i32.const 0) (i32.const 0)))",
    ));
    let result = world.execute(caller, vec![], DEFAULT_GAS).unwrap();
    assert_eq!(result.gas_used, G_CALL);
}

#[test]
fn test_forwarding_more_than_left_is_out_of_gas() {
    let err = run(&call_empty_account(2_000_000, 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfGas);
}

#[test]
fn test_negative_call_gas_is_argument_out_of_range() {
    let err = run(&call_empty_account(-1, 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentOutOfRange);
}

// ── Test: interface metering disabled ──

#[test]
fn test_unmetered_interface_charges_only_use_gas() {
    let sandbox = sandbox_with(SandboxConfig {
        meter_interface_gas: false,
        ..SandboxConfig::default()
    });
    let wat = contract(
        1,
        "(call $useGas (i64.const 100))
         (drop (call $getGasLeft))
         (call $callDataCopy (i32.const 0) (i32.const 0) (i32.const 4))",
    );
    let result = run_with(&sandbox, &wat, vec![1, 2, 3, 4]).unwrap();
    assert_eq!(result.gas_used, 100);
}
