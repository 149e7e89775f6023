// crates/osric-kernel-core/src/interfaces/mod.rs
// ============================================================================
// Module: Kernel Rule Interface
// Description: The plug-in contract a host implements to add rule content.
// Purpose: Define the single trait surface the engine schedules and calls.
// Dependencies: crate::core, crate::runtime
// ============================================================================

//! ## Overview
//! The kernel ships no OSRIC rule content. A host registers [`Rule`]
//! implementations with an [`EngineBuilder`](crate::runtime::EngineBuilder)
//! and the engine takes care of ordering, execution, and effect commit. A
//! rule is required to be a pure function of `(context, command)`: it may
//! read and write the entity store and temporary workspace, stage effects,
//! and draw from the context's RNG, but it must never spawn threads or
//! tasks, block on I/O, or retain a `GameContext` reference past the
//! `execute` call that gave it one — the last point is enforced
//! structurally, since `execute` only borrows `&mut GameContext` for the
//! duration of the call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::command::Command;
use crate::core::result::RuleOutcome;
use crate::runtime::context::GameContext;

// ============================================================================
// SECTION: Rule
// ============================================================================

/// The contract a host implements to add rule content to the engine.
///
/// # Invariants
/// - `name()` returns the same string for the lifetime of the
///   implementation; the engine uses it as a registry key.
/// - `can_apply` never mutates `context`.
/// - `execute` is only ever called after a `can_apply` check returned
///   `true` for the same `(context, command)` pair.
pub trait Rule {
    /// Returns this rule's registry name. Must be unique among rules
    /// registered with the same engine.
    fn name(&self) -> &str;

    /// Returns this rule's scheduling priority. Lower values run earlier
    /// among rules with no prerequisite relationship to each other.
    fn priority(&self) -> i32;

    /// Returns the names of rules that must run, and have completed,
    /// before this one in any chain that includes both.
    fn prerequisites(&self) -> &[String];

    /// Cheap, non-mutating predicate deciding whether this rule applies to
    /// `command` given the current `context`.
    fn can_apply(&self, context: &GameContext, command: &Command) -> bool;

    /// Executes this rule's effect on `context` for `command`.
    ///
    /// Called only when a prior [`Rule::can_apply`] check returned `true`.
    fn execute(&self, context: &mut GameContext, command: &Command) -> RuleOutcome;
}
