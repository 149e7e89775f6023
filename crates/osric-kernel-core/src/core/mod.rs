// crates/osric-kernel-core/src/core/mod.rs
// ============================================================================
// Module: Kernel Core Types
// Description: Canonical data model shared by the interfaces and runtime.
// Purpose: Provide stable, serializable types for identifiers, entities,
// commands, effects, results, and the deterministic RNG.
// Dependencies: serde, serde_json, rand
// ============================================================================

//! ## Overview
//! The core types define the kernel's data model: branded entity
//! identifiers, the opaque [`entity::Entity`] contract, the immutable
//! [`command::Command`] record, the staged [`effect::Effect`] model, the
//! tagged [`result::RuleOutcome`] union, and the seeded [`rng::Rng`]. These
//! types are shared by every rule body and by the runtime scheduler; none
//! of them depend on the runtime module.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod command;
pub mod effect;
pub mod entity;
pub mod identifiers;
pub mod result;
pub mod rng;
