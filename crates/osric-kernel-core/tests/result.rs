// crates/osric-kernel-core/tests/result.rs
// ============================================================================
// Module: Rule Outcome Builder Tests
// Description: Tests for the success/failure outcome builders.
// ============================================================================

//! ## Overview
//! Validates the builder defaults, chain-control flags, and that a
//! failure outcome always reports `stops_chain() == true` regardless of
//! its `critical` flag.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

use osric_kernel_core::RuleOutcome;
use osric_kernel_core::create_failure_result;
use osric_kernel_core::create_success_result;
use serde_json::Map;
use serde_json::json;

#[test]
fn success_defaults_do_not_stop_chain() {
    let outcome = create_success_result("ok").build();
    assert!(!outcome.stops_chain());
    assert!(!outcome.is_critical_failure());
}

#[test]
fn success_stop_chain_flag_is_honored() {
    let outcome = create_success_result("ok, but stop").stop_chain(true).build();
    assert!(outcome.stops_chain());
}

#[test]
fn success_carries_data_and_damage() {
    let mut data = Map::new();
    data.insert("hit".to_string(), json!(true));
    let outcome = create_success_result("hit").data(data.clone()).damage(7).effects_declared(2).build();

    let RuleOutcome::Success(success) = outcome else {
        panic!("expected a success outcome");
    };
    assert_eq!(success.data, data);
    assert_eq!(success.damage, Some(7));
    assert_eq!(success.effects_declared, 2);
}

#[test]
fn failure_always_stops_chain_regardless_of_critical() {
    let non_critical = create_failure_result("nope").build();
    assert!(non_critical.stops_chain());
    assert!(!non_critical.is_critical_failure());

    let critical = create_failure_result("catastrophe").critical(true).build();
    assert!(critical.stops_chain());
    assert!(critical.is_critical_failure());
}
