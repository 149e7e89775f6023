// crates/osric-kernel-core/src/core/entity.rs
// ============================================================================
// Module: Kernel Entity Contract
// Description: The opaque entity contract the kernel stores and replaces.
// Purpose: Let the kernel hold arbitrary host-defined entity types without
// knowing their shape.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! The kernel treats entities opaquely. It only requires each entity to
//! expose a stable, branded identifier; everything else about an entity
//! (ability scores, hit points, inventory, whatever a rule body needs) is
//! entirely up to the host. Entities are created by commands, held by a
//! [`GameContext`], and mutated only through whole-value replacement via
//! [`GameContext::set_entity`] — there is no in-place mutation contract.
//!
//! [`GameContext`]: crate::runtime::GameContext
//! [`GameContext::set_entity`]: crate::runtime::GameContext::set_entity

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt::Debug;

use crate::core::identifiers::EntityId;

// ============================================================================
// SECTION: Entity Contract
// ============================================================================

/// The contract every entity stored in a [`GameContext`] must satisfy.
///
/// [`GameContext`]: crate::runtime::GameContext
///
/// # Invariants
/// - `id()` returns a stable identifier for the lifetime of the value.
/// - Implementors provide `as_any`/`as_any_mut` as `{ self }`; the kernel
///   uses them only to support typed lookups, never to bypass the entity
///   store's ownership.
pub trait Entity: Any + Debug + Send + Sync {
    /// Returns this entity's stable, branded identifier.
    fn id(&self) -> EntityId;

    /// Returns `self` as `&dyn Any` so the context can downcast to a
    /// concrete entity type on lookup.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as `&mut dyn Any` so the context can downcast to a
    /// concrete entity type on mutable lookup.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
