// crates/osric-kernel-core/src/core/command.rs
// ============================================================================
// Module: Kernel Command Record
// Description: The immutable command record dispatched to the rule engine.
// Purpose: Carry a command's type, parameters, and entity references
// through validation, ordering, and execution.
// Dependencies: serde_json, crate::core::identifiers
// ============================================================================

//! ## Overview
//! A [`Command`] is immutable once constructed: the engine never mutates a
//! caller's command, only the [`GameContext`] a command acts on.
//! `actor_id` is optional because some command types (a bare `roll`
//! diagnostic, for instance) act on no entity at all; when a command type
//! does require an actor, that requirement is enforced by the command's
//! parameter validator at registration, not by the shape of [`Command`]
//! itself.
//!
//! [`GameContext`]: crate::runtime::GameContext

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::identifiers::EntityId;

// ============================================================================
// SECTION: Command
// ============================================================================

/// An immutable command submitted to [`Engine::execute`].
///
/// [`Engine::execute`]: crate::runtime::Engine::execute
///
/// # Invariants
/// - `command_type` matches a type string registered with the engine;
///   unregistered types are rejected before a `Command` is constructed.
/// - `parameters` has not yet been validated against the command's
///   validator; validation happens during the `Validating` state.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// The registered command type this command was submitted as.
    command_type: String,
    /// Caller-supplied parameters, validated before any rule runs.
    parameters: Value,
    /// The entity performing this command, if any.
    actor_id: Option<EntityId>,
    /// Entities this command targets, if any.
    target_ids: Vec<EntityId>,
}

impl Command {
    /// Creates a new command.
    #[must_use]
    pub fn new(command_type: impl Into<String>, parameters: Value) -> Self {
        Self {
            command_type: command_type.into(),
            parameters,
            actor_id: None,
            target_ids: Vec::new(),
        }
    }

    /// Sets the acting entity for this command.
    #[must_use]
    pub fn with_actor(mut self, actor_id: EntityId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Sets the targeted entities for this command.
    #[must_use]
    pub fn with_targets(mut self, target_ids: Vec<EntityId>) -> Self {
        self.target_ids = target_ids;
        self
    }

    /// Returns this command's registered type string.
    #[must_use]
    pub fn command_type(&self) -> &str {
        &self.command_type
    }

    /// Returns this command's caller-supplied parameters.
    #[must_use]
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Returns this command's acting entity, if any.
    #[must_use]
    pub fn actor_id(&self) -> Option<&EntityId> {
        self.actor_id.as_ref()
    }

    /// Returns this command's targeted entities.
    #[must_use]
    pub fn target_ids(&self) -> &[EntityId] {
        &self.target_ids
    }
}
