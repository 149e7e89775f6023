// crates/osric-kernel-core/src/lib.rs
// ============================================================================
// Module: OSRIC Kernel Core Library
// Description: Public API surface for the rule orchestration kernel.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The kernel coordinates independently-authored rules under a
//! priority/dependency schedule, provides deterministic replay under a
//! seeded RNG, and routes per-command side effects through a commit phase
//! so a mid-chain failure aborts cleanly. It is ruleset-agnostic: rule
//! bodies, command catalogs, and domain data tables are supplied by the
//! host and plug into the kernel through the [`interfaces::Rule`] trait
//! and the [`runtime::EngineBuilder`] registration API.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::command::Command;
pub use core::effect::Effect;
pub use core::effect::EffectEnvelope;
pub use core::effect::Effects;
pub use core::entity::Entity;
pub use core::identifiers::EntityId;
pub use core::identifiers::EntityKind;
pub use core::result::FailureResultBuilder;
pub use core::result::RuleOutcome;
pub use core::result::SuccessResultBuilder;
pub use core::result::create_failure_result;
pub use core::result::create_success_result;
pub use core::rng::Rng;
pub use core::rng::RngError;
pub use interfaces::Rule;
pub use runtime::CommandResult;
pub use runtime::CommandSuccess;
pub use runtime::Engine;
pub use runtime::EngineBuilder;
pub use runtime::EngineConfig;
pub use runtime::EngineError;
pub use runtime::EngineHandle;
pub use runtime::GameContext;
