// crates/osric-kernel-core/src/runtime/context.rs
// ============================================================================
// Module: Kernel Game Context
// Description: The per-engine shared state a command executes against.
// Purpose: Hold the entity store, transient workspace, RNG, effect log,
// and a back-reference to the owning engine.
// Dependencies: crate::core, std::sync
// ============================================================================

//! ## Overview
//! A [`GameContext`] is the single piece of mutable state every rule body
//! reads and writes. One context belongs to one [`Engine`](crate::runtime::Engine)
//! for its lifetime; the engine hands out `&mut GameContext` for the
//! duration of one command at a time, so Rust's own borrow rules give the
//! single-threaded, serialized execution model the kernel requires without
//! a runtime lock. The context also holds a weak back-reference to its
//! owning engine's shared state so rule bodies can look up `rule_engine()`
//! without creating an ownership cycle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Weak;

use serde_json::Value;

use crate::core::effect::Effect;
use crate::core::effect::EffectBuffer;
use crate::core::effect::EffectEnvelope;
use crate::core::effect::Effects;
use crate::core::entity::Entity;
use crate::core::identifiers::EntityId;
use crate::core::rng::Rng;
use crate::runtime::engine::EngineHandle;
use crate::runtime::engine::EngineState;

// ============================================================================
// SECTION: Game Context
// ============================================================================

/// The shared, mutable state a command executes against.
///
/// # Invariants
/// - Every entity in `entities` is reachable only by its own [`EntityId`];
///   there is no secondary index.
/// - `temporary` is cleared at the start of every command unless the
///   owning engine's configuration disables that.
/// - `rng` advances monotonically across the context's lifetime and is
///   never duplicated or reseeded mid-run.
/// - `committed` only ever grows, by whole envelopes, in command-completion
///   order.
pub struct GameContext {
    /// Entities held by id.
    entities: HashMap<EntityId, Box<dyn Entity>>,
    /// Untyped per-command scratch space, cleared between commands unless
    /// configured otherwise.
    temporary: HashMap<String, Value>,
    /// The context's deterministic random source.
    rng: Rng,
    /// Weak back-reference to the owning engine's shared state.
    engine: Weak<EngineState>,
    /// The authoritative, append-only, ordered log of committed envelopes.
    committed: Vec<EffectEnvelope>,
    /// Total number of effects committed across every envelope so far,
    /// used to assign each new envelope's `sequence_start`.
    total_committed: u64,
    /// Staging buffer for the command currently executing. Empty and
    /// inert outside of a command's execution window.
    buffer: EffectBuffer,
}

impl GameContext {
    /// Creates a new context seeded with `seed` and owned by `engine`.
    pub(crate) fn new(seed: u64, engine: Weak<EngineState>) -> Self {
        Self {
            entities: HashMap::new(),
            temporary: HashMap::new(),
            rng: Rng::seeded(seed),
            engine,
            committed: Vec::new(),
            total_committed: 0,
            buffer: EffectBuffer::new(),
        }
    }

    // ------------------------------------------------------------------
    // Entity store
    // ------------------------------------------------------------------

    /// Returns whether an entity with `id` is stored.
    #[must_use]
    pub fn has_entity(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Looks up an entity by id, downcasting to a concrete type `T`.
    ///
    /// Returns `None` if no entity is stored under `id`, or if the stored
    /// entity is not of type `T`. Typed access is discipline-only: the
    /// context does not enforce a value's shape for a given id.
    #[must_use]
    pub fn get_entity<T: Entity>(&self, id: &EntityId) -> Option<&T> {
        self.entities.get(id).and_then(|entity| entity.as_any().downcast_ref::<T>())
    }

    /// Stores `entity` under its own id, replacing any prior value. There
    /// is no in-place mutation contract; updates are whole-value
    /// replacement.
    pub fn set_entity(&mut self, entity: Box<dyn Entity>) {
        self.entities.insert(entity.id(), entity);
    }

    /// Removes the entity stored under `id`, if any. Idempotent: removing
    /// an absent id is not an error.
    pub fn delete_entity(&mut self, id: &EntityId) {
        self.entities.remove(id);
    }

    // ------------------------------------------------------------------
    // Temporary workspace
    // ------------------------------------------------------------------

    /// Sets a value in the per-command temporary workspace.
    pub fn set_temporary(&mut self, key: impl Into<String>, value: Value) {
        self.temporary.insert(key.into(), value);
    }

    /// Reads a value from the temporary workspace, deserializing it into
    /// `T`. Returns `None` if the key is absent or does not deserialize
    /// into `T`.
    #[must_use]
    pub fn get_temporary<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.temporary
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Clears the temporary workspace. Called automatically at the start
    /// of every command unless the engine is configured not to.
    pub fn clear_temporary(&mut self) {
        self.temporary.clear();
    }

    // ------------------------------------------------------------------
    // RNG
    // ------------------------------------------------------------------

    /// Returns a mutable handle to the context's deterministic RNG.
    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    // ------------------------------------------------------------------
    // Rule engine back-reference
    // ------------------------------------------------------------------

    /// Returns a handle to the owning engine, if it is still alive.
    ///
    /// The engine outlives every context it owns in ordinary use; this
    /// returns `None` only if the context has outlived its engine, which
    /// does not happen through the public API.
    #[must_use]
    pub fn rule_engine(&self) -> Option<EngineHandle> {
        self.engine.upgrade().map(EngineHandle::from_state)
    }

    // ------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------

    /// Opens a fresh effect buffer, discarding any effects staged by a
    /// prior command.
    pub(crate) fn open_effect_buffer(&mut self) {
        self.buffer = EffectBuffer::new();
    }

    /// Returns the staging facade rule bodies use to declare effects for
    /// the command currently executing.
    pub fn effects<'a>(&'a mut self, command_type: &'a str) -> Effects<'a> {
        Effects::new(command_type, &mut self.buffer)
    }

    /// Atomically flushes the current effect buffer into one
    /// [`EffectEnvelope`] appended to the authoritative event log,
    /// returning the committed effects for the caller's immediate use.
    pub(crate) fn commit_effect_buffer(&mut self, command_type: &str) -> Vec<Effect> {
        let effects = std::mem::replace(&mut self.buffer, EffectBuffer::new()).into_effects();
        let sequence_start = self.total_committed;
        self.total_committed += u64::try_from(effects.len()).unwrap_or(u64::MAX);
        self.committed.push(EffectEnvelope {
            command: command_type.to_string(),
            sequence_start,
            effects: effects.clone(),
        });
        effects
    }

    /// Discards the current effect buffer without committing it.
    pub(crate) fn discard_effect_buffer(&mut self) {
        self.buffer = EffectBuffer::new();
    }

    /// Returns the authoritative, append-only, ordered log of committed
    /// effect envelopes.
    #[must_use]
    pub fn events(&self) -> &[EffectEnvelope] {
        &self.committed
    }
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("entities", &self.entities.len())
            .field("temporary_keys", &self.temporary.len())
            .field("committed_envelopes", &self.committed.len())
            .finish()
    }
}
