// crates/osric-kernel-core/src/core/effect.rs
// ============================================================================
// Module: Kernel Effect Staging
// Description: Per-command effect staging and atomic commit into the
// context's event log.
// Purpose: Let rule bodies declare side effects without applying them until
// the whole command succeeds.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Rules never write directly to a durable log. Instead each rule body
//! stages effects through [`Effects::add`] during its `execute` call; the
//! engine collects every staged effect for the command into one
//! [`EffectEnvelope`] and appends it to the context's event log only once
//! the whole command has succeeded. A mid-chain failure discards whatever
//! was staged — nothing partial is ever observable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::EntityId;

// ============================================================================
// SECTION: Effect
// ============================================================================

/// A single staged side effect.
///
/// # Invariants
/// - `sequence` is monotonically increasing within one command's buffer,
///   starting at zero.
/// - `effect_type` is an open-ended, host-chosen string; the kernel does
///   not interpret it. Convention: lowercase, dash-separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// The host-chosen effect kind, e.g. `"damage-dealt"`.
    pub effect_type: String,
    /// The entity this effect applies to.
    pub target: EntityId,
    /// Arbitrary structured payload describing the effect.
    pub payload: Value,
    /// The command type that produced this effect.
    pub command_type: String,
    /// This effect's position within its command's buffer.
    pub sequence: u32,
}

// ============================================================================
// SECTION: Effect Envelope
// ============================================================================

/// A committed batch of effects produced by one successful command.
///
/// # Invariants
/// - `effects` preserves staging order.
/// - Envelopes appear in the context's event log in command-completion
///   order, because the engine is the sole writer and commands execute
///   one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEnvelope {
    /// The command type that produced this envelope.
    pub command: String,
    /// The sequence number of the first effect in this envelope, relative
    /// to the context's lifetime event log.
    pub sequence_start: u64,
    /// The effects committed in this envelope, in staging order.
    pub effects: Vec<Effect>,
}

// ============================================================================
// SECTION: Effect Buffer
// ============================================================================

/// Per-command staging buffer for effects declared by rule bodies.
///
/// A fresh buffer is opened for every command and either flushed into one
/// [`EffectEnvelope`] on success or discarded on failure; it is never
/// partially committed.
///
/// # Invariants
/// - `sequence` restarts at zero for every new buffer.
#[derive(Debug, Default)]
pub(crate) struct EffectBuffer {
    /// Effects staged so far in this command.
    staged: Vec<Effect>,
}

impl EffectBuffer {
    /// Creates an empty buffer.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stages a new effect, assigning it the next sequence number.
    pub(crate) fn stage(
        &mut self,
        effect_type: impl Into<String>,
        target: EntityId,
        payload: Value,
        command_type: impl Into<String>,
    ) {
        let sequence = u32::try_from(self.staged.len()).unwrap_or(u32::MAX);
        self.staged.push(Effect {
            effect_type: effect_type.into(),
            target,
            payload,
            command_type: command_type.into(),
            sequence,
        });
    }

    /// Returns the number of effects staged so far.
    pub(crate) fn len(&self) -> u32 {
        u32::try_from(self.staged.len()).unwrap_or(u32::MAX)
    }

    /// Consumes the buffer, returning its staged effects in order.
    pub(crate) fn into_effects(self) -> Vec<Effect> {
        self.staged
    }
}

// ============================================================================
// SECTION: Effects Facade
// ============================================================================

/// The staging facade a rule body sees through `GameContext::effects`.
///
/// Only [`Effects::add`] is exposed to rule bodies; there is no read
/// access to effects staged so far, by design — rules declare effects,
/// they do not react to each other's declarations mid-chain.
#[derive(Debug)]
pub struct Effects<'buffer> {
    /// The command type the staged effects belong to.
    command_type: &'buffer str,
    /// The buffer effects are staged into.
    buffer: &'buffer mut EffectBuffer,
}

impl<'buffer> Effects<'buffer> {
    /// Creates a new facade over `buffer` for the given command type.
    pub(crate) fn new(command_type: &'buffer str, buffer: &'buffer mut EffectBuffer) -> Self {
        Self {
            command_type,
            buffer,
        }
    }

    /// Stages a new effect for the current command.
    pub fn add(&mut self, effect_type: impl Into<String>, target: EntityId, payload: Value) {
        self.buffer
            .stage(effect_type, target, payload, self.command_type);
    }

    /// Returns the number of effects staged so far for the current command.
    #[must_use]
    pub fn staged_count(&self) -> u32 {
        self.buffer.len()
    }
}
